//! In-memory ordering for listings the store could not sort.

use std::cmp::Ordering;

use crate::repo::{RawDocument, SortDirection, compare_values};

use super::request::{POPULARITY_FIELD, SortKey};

fn count(doc: &RawDocument) -> i64 {
    doc.get(POPULARITY_FIELD)
        .and_then(|v| v.as_i64())
        .unwrap_or(0)
}

// Missing or malformed timestamps sort as the epoch.
fn micros(doc: &RawDocument, field: &str) -> i64 {
    doc.timestamp(field)
        .map(|t| t.timestamp_micros())
        .unwrap_or(0)
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Stable sort of `docs` by `key`; equal keys keep their incoming order.
pub(crate) fn sort_documents(docs: &mut [RawDocument], key: &SortKey, direction: SortDirection) {
    let direction = key.effective_direction(direction);
    match key {
        SortKey::Popularity => {
            docs.sort_by(|a, b| directed(count(a).cmp(&count(b)), direction));
        }
        SortKey::CreatedAt | SortKey::UpdatedAt => {
            let field = key.field();
            docs.sort_by(|a, b| directed(micros(a, field).cmp(&micros(b, field)), direction));
        }
        SortKey::Field(field) => {
            docs.sort_by(|a, b| directed(compare_values(a.get(field), b.get(field)), direction));
        }
    }
}
