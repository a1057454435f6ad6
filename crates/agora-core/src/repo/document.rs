//! Record shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, InvalidInputError};
use crate::schema::Document;
use crate::types::RecordId;

/// Field holding the store-assigned creation timestamp.
pub const CREATED_AT: &str = "createdAt";

/// Field holding the store-assigned last-update timestamp.
pub const UPDATED_AT: &str = "updatedAt";

/// A record as every backend returns it: an identifier plus its fields.
///
/// Timestamps are stored as RFC 3339 strings in [`CREATED_AT`] and
/// [`UPDATED_AT`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDocument {
    /// The store-assigned identifier.
    pub id: RecordId,
    /// Field name → value.
    pub fields: Map<String, Value>,
}

impl RawDocument {
    pub fn new(id: RecordId, fields: Map<String, Value>) -> Self {
        Self { id, fields }
    }

    /// Returns a field value, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns a string field, if present and a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// Returns a timestamp field, if present and well formed.
    pub fn timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        self.get_str(field)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc))
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp(CREATED_AT)
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp(UPDATED_AT)
    }

    /// Returns true if any of `fields` contains `needle` (already lowercased).
    pub(crate) fn matches_text(&self, fields: &[&str], needle: &str) -> bool {
        fields.iter().any(|f| {
            self.get_str(f)
                .is_some_and(|text| text.to_lowercase().contains(needle))
        })
    }

    /// Decode into a typed record.
    ///
    /// # Errors
    ///
    /// Returns an error if the fields do not match the schema of `D`.
    pub fn into_record<D: Document>(self) -> Result<Record<D>, Error> {
        let created_at = self.created_at();
        let updated_at = self.updated_at();
        let data = serde_json::from_value(Value::Object(self.fields)).map_err(|e| {
            InvalidInputError::Schema {
                collection: D::COLLECTION,
                reason: format!("record {}: {}", self.id, e),
            }
        })?;

        Ok(Record {
            id: self.id,
            created_at,
            updated_at,
            data,
        })
    }
}

/// A typed record.
///
/// Two records are equal when their identifiers are equal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record<D> {
    pub id: RecordId,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub data: D,
}

impl<D> PartialEq for Record<D> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<D> Eq for Record<D> {}
