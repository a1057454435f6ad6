//! Record identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// Maximum identifier length in bytes.
const MAX_LEN: usize = 1500;

/// A validated record identifier.
///
/// Identifiers are assigned by the store on creation (or chosen by the
/// caller for keyed collections such as user profiles). They are unique
/// within a collection and double as file names in the file backend, so
/// path separators and control characters are rejected.
///
/// # Example
///
/// ```
/// use agora_core::RecordId;
///
/// let id = RecordId::new("9f2c41d0a7b3").unwrap();
/// assert_eq!(id.as_str(), "9f2c41d0a7b3");
/// assert!(RecordId::new("a/b").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Create a new record id from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid identifier.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Returns the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        let reason = if s.is_empty() {
            Some("cannot be empty".to_string())
        } else if s.len() > MAX_LEN {
            Some(format!("exceeds maximum length of {} bytes", MAX_LEN))
        } else if s == "." || s == ".." {
            Some("cannot be '.' or '..'".to_string())
        } else {
            s.chars()
                .find(|c| *c == '/' || *c == '\\' || c.is_control())
                .map(|c| format!("contains invalid character {:?}", c))
        };

        match reason {
            Some(reason) => Err(InvalidInputError::RecordId {
                value: s.to_string(),
                reason,
            }
            .into()),
            None => Ok(()),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RecordId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_ids() {
        assert!(RecordId::new("abc123").is_ok());
        assert!(RecordId::new("a-b_c.d~e").is_ok());
        assert!(RecordId::new("uid:Xy9").is_ok());
    }

    #[test]
    fn invalid_empty() {
        assert!(RecordId::new("").is_err());
    }

    #[test]
    fn invalid_dots() {
        assert!(RecordId::new(".").is_err());
        assert!(RecordId::new("..").is_err());
    }

    #[test]
    fn invalid_separators() {
        assert!(RecordId::new("a/b").is_err());
        assert!(RecordId::new("a\\b").is_err());
        assert!(RecordId::new("a\nb").is_err());
    }

    #[test]
    fn invalid_too_long() {
        assert!(RecordId::new("a".repeat(MAX_LEN + 1)).is_err());
        assert!(RecordId::new("a".repeat(MAX_LEN)).is_ok());
    }

    #[test]
    fn serde_validates() {
        let id: RecordId = serde_json::from_str("\"xyz\"").unwrap();
        assert_eq!(id.as_str(), "xyz");
        assert!(serde_json::from_str::<RecordId>("\"x/y\"").is_err());
    }
}
