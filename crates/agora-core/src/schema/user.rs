//! User profiles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};
use crate::types::{Collection, RecordId};

use super::Document;

/// Forum role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Moderator,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            other => Err(InvalidInputError::Other {
                message: format!("unknown role '{}'", other),
            }
            .into()),
        }
    }
}

/// A user profile, keyed by the auth provider's uid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: RecordId,
    pub name: String,
    pub email: String,
    #[serde(rename = "photoURL", default)]
    pub photo_url: String,
    #[serde(default)]
    pub role: Role,
}

/// Profile fields a user may edit. Role changes go through
/// [`Forum::update_user_role`](crate::Forum::update_user_role).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "photoURL", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl Document for UserProfile {
    const COLLECTION: Collection = Collection::Users;
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "email"];
    type Patch = UserProfilePatch;
}
