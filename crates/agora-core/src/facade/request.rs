//! Listing requests and results.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::repo::{CREATED_AT, FieldFilter, OrderBy, SortDirection, UPDATED_AT};
use crate::types::Cursor;

/// Counter field ranked by [`SortKey::Popularity`].
pub const POPULARITY_FIELD: &str = "responseCount";

/// What a listing is ordered by.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    CreatedAt,
    UpdatedAt,
    /// Most responses first, whatever direction is requested.
    Popularity,
    /// Any other field.
    Field(String),
}

impl SortKey {
    /// The stored field this key orders by.
    pub fn field(&self) -> &str {
        match self {
            SortKey::CreatedAt => CREATED_AT,
            SortKey::UpdatedAt => UPDATED_AT,
            SortKey::Popularity => POPULARITY_FIELD,
            SortKey::Field(name) => name,
        }
    }

    /// The direction actually applied for a requested direction.
    pub fn effective_direction(&self, requested: SortDirection) -> SortDirection {
        match self {
            SortKey::Popularity => SortDirection::Desc,
            _ => requested,
        }
    }

    pub(crate) fn order_by(&self, requested: SortDirection) -> OrderBy {
        OrderBy::new(self.field(), self.effective_direction(requested))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Popularity => f.write_str("popularity"),
            other => f.write_str(other.field()),
        }
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "created-at" | "createdAt" => SortKey::CreatedAt,
            "updated-at" | "updatedAt" => SortKey::UpdatedAt,
            "popularity" => SortKey::Popularity,
            other => SortKey::Field(other.to_string()),
        })
    }
}

/// A logical listing request.
///
/// # Example
///
/// ```
/// use agora_core::{ListRequest, SortDirection, SortKey};
///
/// let request = ListRequest::new()
///     .filter("category", "general")
///     .sort(SortKey::Popularity, SortDirection::Desc)
///     .search("vue");
/// assert!(request.filter.is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListRequest {
    pub filter: Option<FieldFilter>,
    pub sort: SortKey,
    pub direction: SortDirection,
    /// Falls back to the facade's configured default.
    pub page_size: Option<u32>,
    pub cursor: Option<Cursor>,
    pub search: Option<String>,
}

impl ListRequest {
    /// Newest first, default page size, no filter.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter = Some(FieldFilter::equals(field, value));
        self
    }

    pub fn sort(mut self, key: SortKey, direction: SortDirection) -> Self {
        self.sort = key;
        self.direction = direction;
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn after(mut self, cursor: Option<Cursor>) -> Self {
        self.cursor = cursor;
        self
    }

    /// Blank terms are ignored.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = if term.trim().is_empty() {
            None
        } else {
            Some(term)
        };
        self
    }
}

/// How a listing was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    /// Ordered and paged by the store; may carry a continuation cursor.
    Paged,
    /// Capped filtered batch sorted in memory; never paginated.
    FilteredBatch,
}

/// One page of a listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Present only when more records may follow.
    pub next_cursor: Option<Cursor>,
    pub mode: ListMode,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            items: self.items.into_iter().map(f).collect::<Result<_, _>>()?,
            next_cursor: self.next_cursor,
            mode: self.mode,
        })
    }
}
