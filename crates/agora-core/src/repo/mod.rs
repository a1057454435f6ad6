//! Store-level record and query types.
//!
//! These are the shapes exchanged with a [`Store`](crate::Store). The typed
//! layer built on top of them lives in [`crate::facade`].

mod document;
mod query;

pub use document::{CREATED_AT, RawDocument, Record, UPDATED_AT};
pub use query::{FieldFilter, OrderBy, QueryPage, SortDirection, StoreQuery, compare_values};
