//! One entity as a listing row.

use maud::{html, Markup, Render};

use crate::domain::{Entity, EntityKind};

/// Stateless row: identity link, repo link and summary.
pub struct EntityRow<'a> {
    entity: &'a Entity,
    kind: EntityKind,
}

impl<'a> EntityRow<'a> {
    /// Row for `entity` listed under `kind`.
    pub fn new(entity: &'a Entity, kind: EntityKind) -> Self {
        Self { entity, kind }
    }

    /// Link to the entity's detail page.
    pub fn detail_href(&self) -> String {
        self.kind.detail_path(&self.entity.id)
    }
}

impl Render for EntityRow<'_> {
    fn render(&self) -> Markup {
        let entity = self.entity;
        html! {
            div class=(format!("entity {}", self.kind.label())) {
                div class="identity" {
                    a href=(self.detail_href()) alt=(entity.id.as_str()) { (entity.name) }
                }
                div class="repo" {
                    a href=(entity.repo) { "Repo" }
                }
                div class="summary" { (entity.summary) }
            }
        }
    }
}
