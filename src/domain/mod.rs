//! Domain types: the query and the entities it filters.

mod entity;
mod query;

pub use entity::{Entity, EntityId, EntityKind};
pub use query::Query;
