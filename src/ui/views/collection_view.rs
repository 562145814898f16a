//! Collection view.
//!
//! One view per entity kind. It owns the fetch cycle for its collection:
//! - fetches once at mount and again on every props update
//! - applies a response only while mounted
//! - reports failures to the diagnostic sink and keeps the old list
//!
//! Fetches run as independent tokio tasks and are never cancelled. Under
//! [`FetchOrdering::ArrivalOrder`] the last response to arrive wins, even
//! when it answers an older query.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use maud::{html, Markup, Render};
use parking_lot::RwLock;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use url::Url;

use crate::domain::{Entity, EntityKind, Query};
use crate::services::{CollectionFetcher, DiagnosticSink, FetchFailure, FetchOrdering};
use crate::ui::components::EntityRow;

/// A kind bound to its collection URL, fixed at composition time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionBinding {
    kind: EntityKind,
    url: Url,
}

impl CollectionBinding {
    /// Binds `kind` to its collection endpoint under `base`.
    pub fn new(base: &Url, kind: EntityKind) -> Result<Self, url::ParseError> {
        Ok(Self {
            kind,
            url: base.join(kind.collection_path())?,
        })
    }

    /// Kind listed at this endpoint.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Absolute collection URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Endpoint path, as reported in diagnostics.
    pub fn endpoint(&self) -> &str {
        self.url.path()
    }
}

/// What the parent passes down on every update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionProps {
    pub query: Query,
    pub logged_in: bool,
}

/// Collaborators shared by every view of one widget.
pub struct FetchContext<F: CollectionFetcher + ?Sized> {
    fetcher: Arc<F>,
    sink: Arc<dyn DiagnosticSink>,
    ordering: FetchOrdering,
    revision: Arc<watch::Sender<u64>>,
}

impl<F: CollectionFetcher + ?Sized> FetchContext<F> {
    /// Creates a context using arrival ordering.
    pub fn new(fetcher: Arc<F>, sink: Arc<dyn DiagnosticSink>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            fetcher,
            sink,
            ordering: FetchOrdering::default(),
            revision: Arc::new(revision),
        }
    }

    /// Sets how overlapping responses are applied.
    pub fn with_ordering(mut self, ordering: FetchOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    /// Ordering used by every view sharing this context.
    pub fn ordering(&self) -> FetchOrdering {
        self.ordering
    }

    /// Receiver bumped each time any view applies a response.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}

impl<F: CollectionFetcher + ?Sized> Clone for FetchContext<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            sink: Arc::clone(&self.sink),
            ordering: self.ordering,
            revision: Arc::clone(&self.revision),
        }
    }
}

#[derive(Debug, Default)]
struct Snapshot {
    entities: Arc<Vec<Entity>>,
    /// Sequence number of the response currently shown.
    seq: u64,
}

/// State shared between a view and its in-flight fetches.
#[derive(Debug)]
struct CollectionState {
    kind: EntityKind,
    snapshot: RwLock<Snapshot>,
    /// Cleared at teardown under the snapshot write lock; checked under the
    /// same lock before every apply.
    mounted: AtomicBool,
    next_seq: AtomicU64,
}

impl CollectionState {
    fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            snapshot: RwLock::new(Snapshot::default()),
            mounted: AtomicBool::new(true),
            next_seq: AtomicU64::new(0),
        }
    }

    fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    /// Replaces the current list and bumps `revision`, unless the view is
    /// unmounted or the response is stale. Returns whether it applied.
    fn apply(
        &self,
        seq: u64,
        entities: Vec<Entity>,
        ordering: FetchOrdering,
        revision: &watch::Sender<u64>,
    ) -> bool {
        let mut snapshot = self.snapshot.write();
        if !self.is_mounted() {
            tracing::debug!(kind = %self.kind, seq, "discarding response for unmounted view");
            return false;
        }
        if ordering == FetchOrdering::LatestRequest && seq < snapshot.seq {
            tracing::debug!(kind = %self.kind, seq, shown = snapshot.seq, "discarding stale response");
            return false;
        }
        tracing::debug!(kind = %self.kind, seq, count = entities.len(), "applying response");
        snapshot.entities = Arc::new(entities);
        snapshot.seq = seq;
        revision.send_modify(|rev| *rev += 1);
        true
    }

    /// Clears the mount flag. Waits for an apply in progress to finish, so
    /// nothing changes once this returns.
    fn unmount(&self) {
        let _snapshot = self.snapshot.write();
        self.mounted.store(false, Ordering::Release);
    }
}

/// Read-only view of a collection's state that outlives the view itself.
#[derive(Debug, Clone)]
pub struct CollectionHandle {
    state: Arc<CollectionState>,
}

impl CollectionHandle {
    /// The list last applied.
    pub fn entities(&self) -> Arc<Vec<Entity>> {
        Arc::clone(&self.state.snapshot.read().entities)
    }

    /// Whether the view is still mounted.
    pub fn is_mounted(&self) -> bool {
        self.state.is_mounted()
    }
}

/// The listing for one entity kind.
pub struct CollectionView<F: CollectionFetcher + ?Sized + 'static> {
    binding: CollectionBinding,
    props: CollectionProps,
    ctx: FetchContext<F>,
    state: Arc<CollectionState>,
    in_flight: Vec<JoinHandle<()>>,
    fetches_issued: u64,
}

impl<F: CollectionFetcher + ?Sized + 'static> CollectionView<F> {
    /// Mounts the view and issues the first fetch.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(binding: CollectionBinding, props: CollectionProps, ctx: FetchContext<F>) -> Self {
        let state = Arc::new(CollectionState::new(binding.kind()));
        let mut view = Self {
            binding,
            props,
            ctx,
            state,
            in_flight: Vec::new(),
            fetches_issued: 0,
        };
        view.fetch();
        view
    }

    /// Takes new props and fetches again, even if the query is unchanged.
    pub fn receive_props(&mut self, props: CollectionProps) {
        self.props = props;
        self.fetch();
    }

    fn fetch(&mut self) {
        let seq = self.state.next_seq.fetch_add(1, Ordering::Relaxed) + 1;
        self.fetches_issued += 1;

        let fetcher = Arc::clone(&self.ctx.fetcher);
        let sink = Arc::clone(&self.ctx.sink);
        let revision = Arc::clone(&self.ctx.revision);
        let state = Arc::clone(&self.state);
        let ordering = self.ctx.ordering();
        let url = self.binding.url().clone();
        let endpoint = self.binding.endpoint().to_string();
        let query = self.props.query.clone();

        tracing::debug!(kind = %self.binding.kind(), seq, query = %query, "issuing fetch");
        let handle = tokio::spawn(async move {
            match fetcher.fetch(&url, &query).await {
                Ok(entities) => {
                    state.apply(seq, entities, ordering, &revision);
                }
                Err(err) => sink.report(&FetchFailure::new(endpoint, &err)),
            }
        });

        self.in_flight.retain(|h| !h.is_finished());
        self.in_flight.push(handle);
    }

    /// Waits for every fetch issued so far to finish.
    pub async fn settle(&mut self) {
        let handles = std::mem::take(&mut self.in_flight);
        for result in join_all(handles).await {
            if let Err(err) = result {
                tracing::warn!(kind = %self.binding.kind(), error = %err, "fetch task failed");
            }
        }
    }

    /// Tears the view down. In-flight fetches keep running but their
    /// results are dropped.
    pub fn unmount(self) {
        tracing::debug!(kind = %self.binding.kind(), "unmounting collection view");
    }

    /// Kind this view lists.
    pub fn kind(&self) -> EntityKind {
        self.binding.kind()
    }

    /// Endpoint binding fixed at mount.
    pub fn binding(&self) -> &CollectionBinding {
        &self.binding
    }

    /// Props from the latest update.
    pub fn props(&self) -> &CollectionProps {
        &self.props
    }

    /// The list currently shown.
    pub fn entities(&self) -> Arc<Vec<Entity>> {
        Arc::clone(&self.state.snapshot.read().entities)
    }

    /// Number of fetches started, including the one at mount.
    pub fn fetches_issued(&self) -> u64 {
        self.fetches_issued
    }

    /// Handle that can read the state after the view is gone.
    pub fn handle(&self) -> CollectionHandle {
        CollectionHandle {
            state: Arc::clone(&self.state),
        }
    }
}

impl<F: CollectionFetcher + ?Sized + 'static> Drop for CollectionView<F> {
    fn drop(&mut self) {
        self.state.unmount();
    }
}

impl<F: CollectionFetcher + ?Sized + 'static> Render for CollectionView<F> {
    fn render(&self) -> Markup {
        let kind = self.kind();
        let entities = self.entities();
        html! {
            div class="entityBox" id=(kind.label()) {
                h2 class="splash-head" {
                    (kind.label()) ": "
                    @if self.props.logged_in {
                        a href=(kind.create_path()) { "+" }
                    }
                }
                div class="entities" {
                    @for entity in entities.iter() {
                        (EntityRow::new(entity, kind))
                    }
                }
            }
        }
    }
}
