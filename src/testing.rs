//! Test doubles shared by the view tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{oneshot, watch};
use tokio::time::error::Elapsed;
use url::Url;

use crate::domain::{Entity, EntityId, Query};
use crate::services::{CollectionFetcher, FetchError};

type Reply = Result<Vec<Entity>, FetchError>;

/// One recorded fetch.
#[derive(Debug, Clone)]
pub struct FetchCall {
    pub url: Url,
    pub query: Query,
}

struct Pending {
    call: FetchCall,
    reply: Option<oneshot::Sender<Reply>>,
}

/// Fetcher whose responses are released by the test, in any order.
#[derive(Default)]
pub struct ScriptedFetcher {
    calls: Mutex<Vec<Pending>>,
    deliveries: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn call(&self, index: usize) -> FetchCall {
        self.calls.lock()[index].call.clone()
    }

    /// Index of the most recent call to `path` with `query`.
    pub fn find_call(&self, path: &str, query: &str) -> Option<usize> {
        self.calls
            .lock()
            .iter()
            .rposition(|p| p.call.url.path() == path && p.call.query.as_str() == query)
    }

    /// Releases the response for call `index`.
    pub fn respond(&self, index: usize, reply: Reply) {
        let sender = self.calls.lock()[index]
            .reply
            .take()
            .expect("call already answered");
        let _ = sender.send(reply);
    }

    /// Answers every pending call with an empty list.
    pub fn respond_all_empty(&self) {
        for sender in self.calls.lock().iter_mut().filter_map(|p| p.reply.take()) {
            let _ = sender.send(Ok(Vec::new()));
        }
    }

    /// Waits until at least `count` fetches have started.
    pub async fn wait_for_calls(&self, count: usize) {
        wait_until(|| self.call_count() >= count)
            .await
            .unwrap_or_else(|_| panic!("expected {count} fetches, saw {}", self.call_count()));
    }

    /// Waits until at least `count` replies have reached their fetch.
    pub async fn wait_for_deliveries(&self, count: usize) {
        wait_until(|| self.deliveries.load(Ordering::SeqCst) >= count)
            .await
            .unwrap_or_else(|_| panic!("expected {count} deliveries"));
    }
}

#[async_trait::async_trait]
impl CollectionFetcher for ScriptedFetcher {
    async fn fetch(&self, endpoint: &Url, query: &Query) -> Reply {
        let (tx, rx) = oneshot::channel();
        self.calls.lock().push(Pending {
            call: FetchCall {
                url: endpoint.clone(),
                query: query.clone(),
            },
            reply: Some(tx),
        });
        let reply = rx.await.unwrap_or_else(|_| Ok(Vec::new()));
        self.deliveries.fetch_add(1, Ordering::SeqCst);
        reply
    }
}

/// Polls `done` on a short sleep, giving up after five seconds. Works on
/// either scheduler flavor.
async fn wait_until(mut done: impl FnMut() -> bool) -> Result<(), Elapsed> {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !done() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
}

pub fn entity(id: &str, name: &str) -> Entity {
    Entity {
        id: EntityId::from(id),
        name: name.to_string(),
        summary: format!("{name} summary"),
        repo: format!("https://github.com/juju/{id}"),
        kind: None,
    }
}

pub async fn wait_changed(revision: &mut watch::Receiver<u64>) {
    tokio::time::timeout(Duration::from_secs(5), revision.changed())
        .await
        .expect("no render within timeout")
        .expect("revision sender dropped");
}
