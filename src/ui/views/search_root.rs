//! Search root.
//!
//! Owns the committed [`Query`] and fans it out to every collection view.
//! The input reports queries up, the root commits them, the views only ever
//! receive them.

use maud::{html, Markup, Render};
use tokio::sync::watch;
use url::Url;

use crate::domain::{EntityKind, Query};
use crate::services::CollectionFetcher;
use crate::ui::views::{
    CollectionBinding, CollectionProps, CollectionView, FetchContext, InputEdit, SearchInput,
};

/// The whole widget: one search input over N collection views.
pub struct SearchRoot<F: CollectionFetcher + ?Sized + 'static> {
    query: Query,
    logged_in: bool,
    input: SearchInput,
    views: Vec<CollectionView<F>>,
    ctx: FetchContext<F>,
}

impl<F: CollectionFetcher + ?Sized + 'static> SearchRoot<F> {
    /// Mounts the root and one view per binding, in order.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(bindings: Vec<CollectionBinding>, logged_in: bool, ctx: FetchContext<F>) -> Self {
        let query = Query::empty();
        let views = bindings
            .into_iter()
            .map(|binding| {
                let props = CollectionProps {
                    query: query.clone(),
                    logged_in,
                };
                CollectionView::mount(binding, props, ctx.clone())
            })
            .collect();
        Self {
            query,
            logged_in,
            input: SearchInput::new(),
            views,
            ctx,
        }
    }

    /// Mounts the interface and layer collections under `base`.
    pub fn with_default_collections(
        base: &Url,
        logged_in: bool,
        ctx: FetchContext<F>,
    ) -> Result<Self, url::ParseError> {
        let bindings = EntityKind::ALL
            .into_iter()
            .map(|kind| CollectionBinding::new(base, kind))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::mount(bindings, logged_in, ctx))
    }

    /// Applies an edit to the input and commits the resulting query.
    pub fn handle_edit(&mut self, edit: InputEdit) -> &Query {
        let query = self.input.apply(edit);
        self.commit(query);
        &self.query
    }

    /// Applies an edit without committing, for hosts that debounce.
    pub fn edit_input(&mut self, edit: InputEdit) -> Query {
        self.input.apply(edit)
    }

    /// Clears the input and commits the empty query.
    pub fn clear(&mut self) {
        let query = self.input.clear();
        self.commit(query);
    }

    /// Stores `query` and passes it to every view.
    pub fn commit(&mut self, query: Query) {
        tracing::debug!(query = %query, "committing query");
        self.query = query;
        for view in &mut self.views {
            view.receive_props(CollectionProps {
                query: self.query.clone(),
                logged_in: self.logged_in,
            });
        }
    }

    /// The committed query.
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// The search input.
    pub fn input(&self) -> &SearchInput {
        &self.input
    }

    /// Collection views in display order.
    pub fn views(&self) -> &[CollectionView<F>] {
        &self.views
    }

    /// The view listing `kind`, if mounted.
    pub fn view(&self, kind: EntityKind) -> Option<&CollectionView<F>> {
        self.views.iter().find(|view| view.kind() == kind)
    }

    /// Receiver bumped whenever any collection changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.ctx.subscribe()
    }

    /// Waits for every in-flight fetch of every view.
    pub async fn settle(&mut self) {
        for view in &mut self.views {
            view.settle().await;
        }
    }

    /// Tears down the root and every view.
    pub fn unmount(self) {
        tracing::debug!("unmounting search root");
        for view in self.views {
            view.unmount();
        }
    }
}

impl<F: CollectionFetcher + ?Sized + 'static> Render for SearchRoot<F> {
    fn render(&self) -> Markup {
        html! {
            div id="entity-box" {
                (self.input)
                @for view in &self.views {
                    (view)
                }
            }
        }
    }
}
