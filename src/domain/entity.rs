//! Entities listed by the index and the closed set of kinds they come in.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The kinds of entity the index serves.
///
/// Each kind owns its paths so nothing else builds URLs by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A relation interface.
    Interface,
    /// A charm layer.
    Layer,
}

impl EntityKind {
    /// Every kind, in display order.
    pub const ALL: [EntityKind; 2] = [EntityKind::Interface, EntityKind::Layer];

    /// Label used in headers, CSS classes and paths.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Interface => "interface",
            EntityKind::Layer => "layer",
        }
    }

    /// Collection search endpoint, relative to the site root.
    pub fn collection_path(&self) -> &'static str {
        match self {
            EntityKind::Interface => "/api/v1/interfaces",
            EntityKind::Layer => "/api/v1/layers/",
        }
    }

    /// Single-entity API resource, relative to the site root.
    pub fn resource_path(&self, id: &EntityId) -> String {
        format!("/api/v1/{}/{}/", self.label(), id)
    }

    /// Detail page link for one entity.
    pub fn detail_path(&self, id: &EntityId) -> String {
        format!("/{}/{}/", self.label(), id)
    }

    /// "Add new" link. Relative, like the page that hosts the widget.
    pub fn create_path(&self) -> String {
        format!("{}/+/", self.label())
    }

    /// Parses a kind label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifier of an entity, unique within its kind.
///
/// The API sends either strings (`"mysql"`) or numbers; both end up as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Get the id text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        lenient_text(deserializer).map(EntityId)
    }
}

/// One searchable record, as received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub summary: String,
    /// External repository link.
    #[serde(default, deserialize_with = "lenient_text")]
    pub repo: String,
    /// Usually omitted by the API; the owning view knows its kind.
    #[serde(default, deserialize_with = "lenient_kind")]
    pub kind: Option<EntityKind>,
}

/// Scalars become their text form, anything else the empty string.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

fn lenient_kind<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<EntityKind>, D::Error> {
    let label = lenient_text(deserializer)?;
    Ok(EntityKind::from_label(&label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_paths() {
        let id = EntityId::from("mysql");
        assert_eq!(EntityKind::Interface.collection_path(), "/api/v1/interfaces");
        assert_eq!(EntityKind::Layer.collection_path(), "/api/v1/layers/");
        assert_eq!(EntityKind::Interface.detail_path(&id), "/interface/mysql/");
        assert_eq!(EntityKind::Layer.create_path(), "layer/+/");
        assert_eq!(
            EntityKind::Layer.resource_path(&EntityId::from("basic")),
            "/api/v1/layer/basic/"
        );
    }

    #[test]
    fn kind_from_label() {
        assert_eq!(EntityKind::from_label("layer"), Some(EntityKind::Layer));
        assert_eq!(EntityKind::from_label("charm"), None);
    }

    #[test]
    fn decodes_numeric_id_without_kind() {
        let json = r#"[{"id":1,"name":"Foo","summary":"s","repo":"http://x"}]"#;
        let entities: Vec<Entity> = serde_json::from_str(json).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].id.as_str(), "1");
        assert_eq!(entities[0].name, "Foo");
        assert_eq!(entities[0].kind, None);
    }

    #[test]
    fn malformed_fields_decode_as_empty_text() {
        let json = r#"{"id":"pgsql","name":null,"summary":["x"],"kind":"layer"}"#;
        let entity: Entity = serde_json::from_str(json).unwrap();
        assert_eq!(entity.name, "");
        assert_eq!(entity.summary, "");
        assert_eq!(entity.repo, "");
        assert_eq!(entity.kind, Some(EntityKind::Layer));
    }

    #[test]
    fn unknown_kind_is_dropped() {
        let entity: Entity = serde_json::from_str(r#"{"id":"a","kind":"bundle"}"#).unwrap();
        assert_eq!(entity.kind, None);
    }
}
