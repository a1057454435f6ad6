//! agora-core - Core types, schemas and query facade for the agora forum.
//!
//! The forum keeps its data in a remote document store organized as
//! collections (`discussions`, `responses`, `users`, `reports`). Backends
//! implement [`Store`]; [`QueryFacade`] layers filtering, sorting, cursor
//! pagination, free-text search and cascading deletes on top of it, and
//! [`Forum`] exposes the forum's own operations.

pub mod config;
pub mod error;
pub mod facade;
pub mod forum;
pub mod repo;
pub mod schema;
pub mod session;
pub mod tokens;
pub mod traits;
pub mod types;

pub use config::FacadeConfig;
pub use error::{Error, ErrorKind};
pub use facade::{CascadeReport, ListMode, ListRequest, Page, QueryFacade, SortKey};
pub use forum::{DiscussionQuery, Forum, NewDiscussion, NewReport};
pub use repo::{FieldFilter, RawDocument, Record, SortDirection};
pub use schema::{
    AnyDocument, AnyPatch, Discussion, Document, Report, ReportStatus, Response, Role, UserProfile,
};
pub use session::{Identity, SessionContext};
pub use tokens::AccessToken;
pub use traits::Store;
pub use types::{Collection, Cursor, RecordId, StoreUrl};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
