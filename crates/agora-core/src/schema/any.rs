//! Collection-tagged documents for untyped callers.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{Error, InvalidInputError};
use crate::types::Collection;

use super::{
    Discussion, DiscussionPatch, Report, ReportPatch, Response, ResponsePatch, UserProfile,
    UserProfilePatch, to_fields,
};

/// Any known record shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnyDocument {
    Discussion(Discussion),
    Response(Response),
    User(UserProfile),
    Report(Report),
}

/// A partial update for any known record shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnyPatch {
    Discussion(DiscussionPatch),
    Response(ResponsePatch),
    User(UserProfilePatch),
    Report(ReportPatch),
}

fn parse<T: DeserializeOwned>(collection: Collection, value: Value) -> Result<T, Error> {
    serde_json::from_value(value).map_err(|e| {
        InvalidInputError::Schema {
            collection,
            reason: e.to_string(),
        }
        .into()
    })
}

impl AnyDocument {
    /// Parse untyped JSON against the schema of `collection`.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` does not match the collection's schema.
    pub fn from_json(collection: Collection, value: Value) -> Result<Self, Error> {
        Ok(match collection {
            Collection::Discussions => AnyDocument::Discussion(parse(collection, value)?),
            Collection::Responses => AnyDocument::Response(parse(collection, value)?),
            Collection::Users => AnyDocument::User(parse(collection, value)?),
            Collection::Reports => AnyDocument::Report(parse(collection, value)?),
        })
    }

    /// The collection this document belongs to.
    pub fn collection(&self) -> Collection {
        match self {
            AnyDocument::Discussion(_) => Collection::Discussions,
            AnyDocument::Response(_) => Collection::Responses,
            AnyDocument::User(_) => Collection::Users,
            AnyDocument::Report(_) => Collection::Reports,
        }
    }

    pub fn to_fields(&self) -> Result<Map<String, Value>, Error> {
        to_fields(self.collection(), self)
    }
}

impl AnyPatch {
    /// Parse untyped JSON against the patch schema of `collection`.
    ///
    /// # Errors
    ///
    /// Returns an error on unknown or non-editable fields.
    pub fn from_json(collection: Collection, value: Value) -> Result<Self, Error> {
        Ok(match collection {
            Collection::Discussions => AnyPatch::Discussion(parse(collection, value)?),
            Collection::Responses => AnyPatch::Response(parse(collection, value)?),
            Collection::Users => AnyPatch::User(parse(collection, value)?),
            Collection::Reports => AnyPatch::Report(parse(collection, value)?),
        })
    }

    pub fn collection(&self) -> Collection {
        match self {
            AnyPatch::Discussion(_) => Collection::Discussions,
            AnyPatch::Response(_) => Collection::Responses,
            AnyPatch::User(_) => Collection::Users,
            AnyPatch::Report(_) => Collection::Reports,
        }
    }

    pub fn to_fields(&self) -> Result<Map<String, Value>, Error> {
        to_fields(self.collection(), self)
    }
}
