//! agora-file - Filesystem-backed document store.
//!
//! Records live as one JSON file each under
//! `<root>/collections/<collection>/<id>.json`. Writes are serialized with an
//! exclusive lock on `<root>/store.lock`, which also makes counter increments
//! atomic across processes sharing the directory.

mod cursor;
mod disk;
mod store;

pub use store::FileStore;
