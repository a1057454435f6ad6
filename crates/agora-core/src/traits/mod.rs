//! The store seam every backend implements.

mod store;

pub use store::Store;
