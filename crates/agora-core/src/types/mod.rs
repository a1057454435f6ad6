//! Core agora types.
//!
//! These types enforce store invariants at construction time,
//! so an invalid identifier or URL never reaches a backend.

mod collection;
mod cursor;
mod record_id;
mod store_url;

pub use collection::{Collection, Relation};
pub use cursor::Cursor;
pub use record_id::RecordId;
pub use store_url::StoreUrl;
