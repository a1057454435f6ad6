//! Pagination cursor.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque continuation token referencing the last record of a page.
///
/// Produced by a store query and handed back unchanged to resume the same
/// listing. The encoding belongs to the backend that issued it; a cursor is
/// only meaningful for the collection, filter and ordering it came from, and
/// stops being reliable once the underlying result set changes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Wrap a backend-issued token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Cursor {
    fn from(token: String) -> Self {
        Self(token)
    }
}
