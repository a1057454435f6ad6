//! Remote document store trait.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::Result;
use crate::repo::{QueryPage, RawDocument, StoreQuery};
use crate::types::{Collection, RecordId, StoreUrl};

/// A document store organized as named collections of records.
///
/// Implementations expose exactly what a hosted document database offers:
/// get by id, one equality filter, one ordering, a limit, a forward cursor
/// and an atomic numeric increment. Anything beyond that is the facade's job.
#[async_trait]
pub trait Store: Send + Sync {
    /// Returns the URL this store is reached at.
    fn url(&self) -> &StoreUrl;

    /// Run a single query.
    ///
    /// With `order_by`, documents come back ordered by that field in the
    /// requested direction, ties broken by id ascending. A store may reject
    /// a filter combined with an ordering on a different field.
    async fn run_query(&self, collection: Collection, query: &StoreQuery) -> Result<QueryPage>;

    /// Fetch one document. Fails with `NotFound` if it does not exist.
    async fn get_document(&self, collection: Collection, id: &RecordId) -> Result<RawDocument>;

    /// Add a document under a store-assigned id, stamping both timestamps.
    async fn add_document(
        &self,
        collection: Collection,
        fields: Map<String, Value>,
    ) -> Result<RecordId>;

    /// Create or replace a document at a caller-chosen id, stamping both timestamps.
    async fn set_document(
        &self,
        collection: Collection,
        id: &RecordId,
        fields: Map<String, Value>,
    ) -> Result<()>;

    /// Merge fields into an existing document, stamping the update timestamp.
    /// Fails with `NotFound` if it does not exist.
    async fn update_document(
        &self,
        collection: Collection,
        id: &RecordId,
        fields: Map<String, Value>,
    ) -> Result<()>;

    /// Delete a document. Deleting a missing document succeeds.
    async fn delete_document(&self, collection: Collection, id: &RecordId) -> Result<()>;

    /// Atomically add `delta` to a numeric field (a missing field counts as zero).
    /// Fails with `NotFound` if the document does not exist.
    async fn increment(
        &self,
        collection: Collection,
        id: &RecordId,
        field: &str,
        delta: i64,
    ) -> Result<()>;
}
