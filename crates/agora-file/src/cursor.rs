//! Cursor encoding for file-backed queries.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use agora_core::Cursor;
use agora_core::Result;
use agora_core::error::InvalidInputError;
use agora_core::repo::RawDocument;

/// Position of a record within an ordered listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Position {
    /// Value of the ordering field (null when unordered or missing).
    #[serde(default)]
    pub value: Value,
    pub id: String,
}

impl Position {
    pub fn of(doc: &RawDocument, order_field: Option<&str>) -> Self {
        let value = order_field
            .and_then(|field| doc.get(field))
            .cloned()
            .unwrap_or(Value::Null);
        Self {
            value,
            id: doc.id.as_str().to_string(),
        }
    }

    pub fn encode(&self) -> Result<Cursor> {
        Ok(Cursor::new(serde_json::to_string(self)?))
    }

    pub fn decode(cursor: &Cursor) -> Result<Self> {
        serde_json::from_str(cursor.as_str()).map_err(|e| {
            InvalidInputError::Other {
                message: format!("malformed cursor '{}': {}", cursor, e),
            }
            .into()
        })
    }
}
