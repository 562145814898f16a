//! Widget views.
//!
//! Views compose into the widget: the search root owns the input and one
//! collection view per entity kind.

mod collection_view;
mod search_input;
mod search_root;

pub use collection_view::{
    CollectionBinding, CollectionHandle, CollectionProps, CollectionView, FetchContext,
};
pub use search_input::{InputEdit, SearchInput};
pub use search_root::SearchRoot;
