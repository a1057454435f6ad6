//! agora-rest - Document store reached over HTTP.
//!
//! Speaks a small JSON protocol under `/v1/{collection}`. See [`RestStore`].

mod client;
mod store;
mod wire;

pub use store::RestStore;
