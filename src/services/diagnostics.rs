//! Diagnostic sink for failed fetches.
//!
//! Failures never reach the user; they are handed to a [`DiagnosticSink`]
//! so the host can log or collect them.

use std::fmt;

use crate::services::FetchError;

/// What went wrong with one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// Endpoint path as bound to the view, e.g. `/api/v1/layers/`.
    pub endpoint: String,
    /// HTTP status, if a response was received.
    pub status: Option<u16>,
    /// Error message.
    pub error: String,
}

impl FetchFailure {
    /// Describes `error` raised while fetching `endpoint`.
    pub fn new(endpoint: impl Into<String>, error: &FetchError) -> Self {
        Self {
            endpoint: endpoint.into(),
            status: error.status(),
            error: error.to_string(),
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} {} {}", self.endpoint, status, self.error),
            None => write!(f, "{} {}", self.endpoint, self.error),
        }
    }
}

/// Receiver of fetch failures.
#[cfg_attr(test, mockall::automock)]
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, failure: &FetchFailure);
}

/// Sink that logs failures through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, failure: &FetchFailure) {
        tracing::error!(
            endpoint = %failure.endpoint,
            status = ?failure.status,
            error = %failure.error,
            "collection fetch failed"
        );
    }
}
