//! The normalized search query shared by every collection.

use std::fmt;

/// A trimmed filter string. The empty query means "no filter".
///
/// The only way to build one is [`Query::normalize`], so a `Query` never
/// carries leading or trailing whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Query(String);

impl Query {
    /// The unfiltered query.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Trims raw field text into a query.
    pub fn normalize(raw: &str) -> Self {
        Self(raw.trim().to_string())
    }

    /// Returns the query text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns whether this query filters nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `q` parameter to send, if any.
    pub fn as_param(&self) -> Option<&str> {
        if self.is_empty() {
            None
        } else {
            Some(&self.0)
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
