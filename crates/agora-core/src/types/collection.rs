//! Collection names and the relations between them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A named set of records of the same logical kind.
///
/// The set is closed: every collection the forum stores has a schema in
/// [`crate::schema`], and nothing else can be addressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Discussions,
    Responses,
    Users,
    Reports,
}

/// An owner → dependents relation with a denormalized counter on the owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Relation {
    /// Collection holding the owner records.
    pub owner: Collection,
    /// Collection holding the dependent records.
    pub dependents: Collection,
    /// Field on each dependent holding the owner's id.
    pub foreign_key: &'static str,
    /// Field on the owner counting live dependents.
    pub counter: &'static str,
}

const DISCUSSION_RELATIONS: &[Relation] = &[Relation {
    owner: Collection::Discussions,
    dependents: Collection::Responses,
    foreign_key: "discussionId",
    counter: "responseCount",
}];

impl Collection {
    /// All known collections.
    pub const ALL: [Collection; 4] = [
        Collection::Discussions,
        Collection::Responses,
        Collection::Users,
        Collection::Reports,
    ];

    /// Returns the collection name as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Discussions => "discussions",
            Collection::Responses => "responses",
            Collection::Users => "users",
            Collection::Reports => "reports",
        }
    }

    /// Relations in which this collection is the owner.
    ///
    /// Deleting an owner cascades to every dependent listed here.
    pub fn relations(&self) -> &'static [Relation] {
        match self {
            Collection::Discussions => DISCUSSION_RELATIONS,
            _ => &[],
        }
    }

    /// The relation in which this collection holds the dependents, if any.
    ///
    /// Creating or deleting a record here adjusts the owner's counter.
    pub fn owner_relation(&self) -> Option<&'static Relation> {
        Collection::ALL
            .into_iter()
            .flat_map(|c| c.relations())
            .find(|r| r.dependents == *self)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                InvalidInputError::Collection {
                    value: s.to_string(),
                }
                .into()
            })
    }
}
