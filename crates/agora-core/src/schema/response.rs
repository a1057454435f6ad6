//! Responses to a discussion.

use serde::{Deserialize, Serialize};

use crate::types::{Collection, RecordId};

use super::Document;

/// A response posted under a discussion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub discussion_id: RecordId,
    pub content: String,
    pub author_id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResponsePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Document for Response {
    const COLLECTION: Collection = Collection::Responses;
    const SEARCH_FIELDS: &'static [&'static str] = &["content"];
    type Patch = ResponsePatch;
}
