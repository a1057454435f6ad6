//! Error types for agora operations.
//!
//! Every failure surfaces as an explicit [`Error`] variant. [`Error::kind`]
//! folds the variants into the coarse taxonomy callers usually branch on:
//! fetch failures, missing records, and partially applied cascades.

use std::fmt;
use thiserror::Error;

use crate::types::{Collection, RecordId};

/// The unified error type for agora operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout, local IO).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (missing or rejected token).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Protocol errors (unexpected status or response body from the store).
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The requested record does not exist.
    #[error("{collection}/{id} not found")]
    NotFound { collection: Collection, id: RecordId },

    /// A cascading delete stopped part way through.
    #[error("partial cascade failure: {0}")]
    PartialCascade(#[from] PartialCascadeFailure),

    /// Input validation errors (invalid id, URL, or document shape).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport, authentication, or protocol failure during a remote call.
    FetchFailed,
    /// The requested record identifier does not exist.
    NotFound,
    /// Some but not all steps of a cascading delete completed.
    PartialCascadeFailure,
    /// The caller supplied something malformed.
    InvalidInput,
}

impl Error {
    /// Create a not-found error for a record.
    pub fn not_found(collection: Collection, id: &RecordId) -> Self {
        Error::NotFound {
            collection,
            id: id.clone(),
        }
    }

    /// Returns the coarse kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Transport(_) | Error::Auth(_) | Error::Protocol(_) => ErrorKind::FetchFailed,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::PartialCascade(_) => ErrorKind::PartialCascadeFailure,
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }

    /// Returns true if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// Local filesystem error (file-backed stores).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Transport(TransportError::Io(err))
    }
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The store rejected the request's credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The store accepted the credentials but refused the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),
}

/// Protocol-level errors from store responses.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code (or the closest equivalent for local stores).
    pub status: u16,
    /// Machine-readable error code (if present).
    pub error: Option<String>,
    /// Error message from the store.
    pub message: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref error) = self.error {
            write!(f, " [{}]", error)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, error: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            error,
            message,
        }
    }

    /// The store cannot serve a filter combined with a sort on another field.
    pub fn missing_index(filter_field: &str, order_field: &str) -> Self {
        Self::new(
            400,
            Some("FailedPrecondition".to_string()),
            Some(format!(
                "query filtering on '{}' and ordering by '{}' requires a composite index",
                filter_field, order_field
            )),
        )
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401 || self.status == 403
    }
}

/// Outcome of a cascading delete that did not fully complete.
///
/// The owner record is never deleted once a cascade fails. Nothing is
/// rolled back: dependents counted in `dependents_deleted` are gone.
#[derive(Debug, Error)]
#[error(
    "{collection}/{id}: {dependents_deleted} dependents deleted, {dependents_failed} failed, owner kept"
)]
pub struct PartialCascadeFailure {
    /// Collection of the owner record.
    pub collection: Collection,
    /// Identifier of the owner record.
    pub id: RecordId,
    /// Dependents removed before the cascade stopped.
    pub dependents_deleted: usize,
    /// Dependents whose deletion failed.
    pub dependents_failed: usize,
    /// The first underlying failure.
    #[source]
    pub source: Box<Error>,
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid record identifier.
    #[error("invalid record id '{value}': {reason}")]
    RecordId { value: String, reason: String },

    /// Unknown collection name.
    #[error("unknown collection '{value}'")]
    Collection { value: String },

    /// Invalid store URL.
    #[error("invalid store URL '{value}': {reason}")]
    StoreUrl { value: String, reason: String },

    /// A document does not match its collection's schema.
    #[error("document does not match {collection} schema: {reason}")]
    Schema { collection: Collection, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

impl From<serde_json::Error> for InvalidInputError {
    fn from(err: serde_json::Error) -> Self {
        InvalidInputError::Other {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidInput(err.into())
    }
}
