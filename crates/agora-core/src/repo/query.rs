//! Store query types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};
use crate::types::Cursor;

use super::RawDocument;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(InvalidInputError::Other {
                message: format!("unknown sort direction '{}'", other),
            }
            .into()),
        }
    }
}

/// An equality predicate on one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

impl FieldFilter {
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Returns true if `doc` satisfies the predicate.
    pub fn matches(&self, doc: &RawDocument) -> bool {
        doc.get(&self.field) == Some(&self.value)
    }
}

/// A single-field ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// One request to the remote store.
///
/// This is exactly what the store can express natively: one equality filter,
/// one ordering, a limit and a forward cursor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreQuery {
    pub filter: Option<FieldFilter>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<u32>,
    pub start_after: Option<Cursor>,
}

/// One page of store results.
#[derive(Debug, Clone, Default)]
pub struct QueryPage {
    /// The documents, in store order.
    pub documents: Vec<RawDocument>,
    /// Cursor referencing the last document, if any were returned.
    pub last: Option<Cursor>,
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

/// Total order over field values used for sorting.
///
/// Missing and null sort lowest, then booleans, numbers, strings. Arrays and
/// objects compare equal among themselves.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            match (x.as_i64(), y.as_i64()) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => x
                    .as_f64()
                    .partial_cmp(&y.as_f64())
                    .unwrap_or(Ordering::Equal),
            }
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_sorts_lowest() {
        assert_eq!(compare_values(None, Some(&json!(0))), Ordering::Less);
        assert_eq!(
            compare_values(Some(&Value::Null), Some(&json!(false))),
            Ordering::Less
        );
    }

    #[test]
    fn numbers_compare_numerically() {
        assert_eq!(
            compare_values(Some(&json!(9)), Some(&json!(10))),
            Ordering::Less
        );
        assert_eq!(
            compare_values(Some(&json!(2.5)), Some(&json!(2))),
            Ordering::Greater
        );
    }

    #[test]
    fn filter_matches_exact_value() {
        let Value::Object(fields) = json!({"category": "general"}) else {
            unreachable!()
        };
        let doc = RawDocument::new(crate::RecordId::new("a").unwrap(), fields);
        assert!(FieldFilter::equals("category", "general").matches(&doc));
        assert!(!FieldFilter::equals("category", "General").matches(&doc));
        assert!(!FieldFilter::equals("missing", "general").matches(&doc));
    }

    #[test]
    fn direction_parses() {
        assert_eq!("asc".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert!("up".parse::<SortDirection>().is_err());
    }
}
