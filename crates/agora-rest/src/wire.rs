//! Request and response bodies of the store's HTTP protocol.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use agora_core::repo::{RawDocument, StoreQuery};
use agora_core::{Cursor, RecordId, Result};

/// Query string of `GET /v1/{collection}`.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_field: Option<String>,
    /// JSON-encoded so the store can tell `"1"` from `1`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_after: Option<String>,
}

impl QueryParams {
    pub fn from_query(query: &StoreQuery) -> Result<Self> {
        let (filter_field, filter_value) = match &query.filter {
            Some(filter) => (
                Some(filter.field.clone()),
                Some(serde_json::to_string(&filter.value)?),
            ),
            None => (None, None),
        };

        Ok(Self {
            filter_field,
            filter_value,
            order_by: query.order_by.as_ref().map(|o| o.field.clone()),
            direction: query.order_by.as_ref().map(|o| o.direction.as_str()),
            limit: query.limit,
            start_after: query.start_after.as_ref().map(|c| c.as_str().to_string()),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DocumentBody {
    pub id: RecordId,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl From<DocumentBody> for RawDocument {
    fn from(body: DocumentBody) -> Self {
        RawDocument::new(body.id, body.fields)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    #[serde(default)]
    pub documents: Vec<DocumentBody>,
    #[serde(default)]
    pub cursor: Option<Cursor>,
}

#[derive(Debug, Serialize)]
pub(crate) struct FieldsBody<'a> {
    pub fields: &'a Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedResponse {
    pub id: RecordId,
}

#[derive(Debug, Serialize)]
pub(crate) struct IncrementBody<'a> {
    pub field: &'a str,
    pub delta: i64,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: Option<String>,
    pub message: Option<String>,
}
