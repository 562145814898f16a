//! Optional debouncing of committed queries.

use std::time::Duration;

use tokio::time::Instant;

use crate::domain::Query;

/// Holds back the latest query until typing pauses for `delay`.
#[derive(Debug)]
pub struct QueryDebouncer {
    delay: Duration,
    pending: Option<(Query, Instant)>,
}

impl QueryDebouncer {
    /// Create a debouncer. A zero delay disables it.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Queues `query`, restarting the delay. With no delay the query is
    /// handed straight back for committing.
    pub fn push(&mut self, query: Query) -> Option<Query> {
        if self.delay.is_zero() {
            return Some(query);
        }
        self.pending = Some((query, Instant::now() + self.delay));
        None
    }

    /// Whether a query is waiting to be committed.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drops the pending query, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Resolves with the pending query once its delay has passed.
    ///
    /// Cancel safe: dropping the future keeps the query pending. Never
    /// resolves when nothing is pending.
    pub async fn ready(&mut self) -> Query {
        let deadline = match &self.pending {
            Some((_, deadline)) => *deadline,
            None => return std::future::pending().await,
        };
        tokio::time::sleep_until(deadline).await;
        match self.pending.take() {
            Some((query, _)) => query,
            None => std::future::pending().await,
        }
    }
}
