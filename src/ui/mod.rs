//! Headless UI for the search widget.
//!
//! Components render to HTML markup with maud:
//! - `components`: stateless pieces (entity rows, the field buffer)
//! - `views`: the search input, collection views and the search root

pub mod components;
pub mod views;

pub use views::{
    CollectionBinding, CollectionHandle, CollectionProps, CollectionView, FetchContext, InputEdit,
    SearchInput, SearchRoot,
};
