//! Discussion threads.

use serde::{Deserialize, Serialize};

use crate::types::{Collection, RecordId};

use super::Document;

/// A discussion thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discussion {
    pub title: String,
    pub content: String,
    pub category: String,
    pub author_id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    /// Number of live responses. Only changed through counter adjustment.
    #[serde(default)]
    pub response_count: i64,
}

/// Editable discussion fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DiscussionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Document for Discussion {
    const COLLECTION: Collection = Collection::Discussions;
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "content"];
    type Patch = DiscussionPatch;
}
