//! Per-collection record schemas.
//!
//! Each collection has one document struct and one patch struct. The facade
//! only accepts these, so a `create` or `update` with a misspelled or
//! mistyped field fails at compile time (or, for the CLI, at parse time)
//! instead of landing in the store.

mod any;
mod discussion;
mod report;
mod response;
mod user;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{Error, InvalidInputError};
use crate::types::Collection;

pub use any::{AnyDocument, AnyPatch};
pub use discussion::{Discussion, DiscussionPatch};
pub use report::{Report, ReportPatch, ReportStatus};
pub use response::{Response, ResponsePatch};
pub use user::{Role, UserProfile, UserProfilePatch};

/// A record shape stored in exactly one collection.
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    /// The collection records of this shape live in.
    const COLLECTION: Collection;

    /// Text fields matched by free-text search.
    const SEARCH_FIELDS: &'static [&'static str] = &[];

    /// Partial update accepted by `update`.
    type Patch: Serialize + Send + Sync;
}

/// Serialize a document or patch into store fields.
///
/// # Errors
///
/// Returns an error if `value` does not serialize to a JSON object.
pub fn to_fields<T: Serialize>(collection: Collection, value: &T) -> Result<Map<String, Value>, Error> {
    match serde_json::to_value(value)? {
        Value::Object(fields) => Ok(fields),
        other => Err(InvalidInputError::Schema {
            collection,
            reason: format!("expected an object, got {}", other),
        }
        .into()),
    }
}

/// Text fields searched for records of `collection`.
pub fn search_fields(collection: Collection) -> &'static [&'static str] {
    match collection {
        Collection::Discussions => Discussion::SEARCH_FIELDS,
        Collection::Responses => Response::SEARCH_FIELDS,
        Collection::Users => UserProfile::SEARCH_FIELDS,
        Collection::Reports => Report::SEARCH_FIELDS,
    }
}
