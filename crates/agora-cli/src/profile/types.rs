//! Store wrapper for CLI use.

use async_trait::async_trait;
use serde_json::{Map, Value};

use agora_core::repo::{QueryPage, RawDocument, StoreQuery};
use agora_core::{Collection, RecordId, Result, Store, StoreUrl};
use agora_file::FileStore;
use agora_rest::RestStore;

/// Whichever backend the profile points at.
#[derive(Debug)]
pub enum CliStore {
    File(FileStore),
    Rest(RestStore),
}

impl CliStore {
    pub fn kind(&self) -> &'static str {
        match self {
            CliStore::File(_) => "file",
            CliStore::Rest(_) => "rest",
        }
    }
}

#[async_trait]
impl Store for CliStore {
    fn url(&self) -> &StoreUrl {
        match self {
            CliStore::File(store) => store.url(),
            CliStore::Rest(store) => store.url(),
        }
    }

    async fn run_query(&self, collection: Collection, query: &StoreQuery) -> Result<QueryPage> {
        match self {
            CliStore::File(store) => store.run_query(collection, query).await,
            CliStore::Rest(store) => store.run_query(collection, query).await,
        }
    }

    async fn get_document(&self, collection: Collection, id: &RecordId) -> Result<RawDocument> {
        match self {
            CliStore::File(store) => store.get_document(collection, id).await,
            CliStore::Rest(store) => store.get_document(collection, id).await,
        }
    }

    async fn add_document(
        &self,
        collection: Collection,
        fields: Map<String, Value>,
    ) -> Result<RecordId> {
        match self {
            CliStore::File(store) => store.add_document(collection, fields).await,
            CliStore::Rest(store) => store.add_document(collection, fields).await,
        }
    }

    async fn set_document(
        &self,
        collection: Collection,
        id: &RecordId,
        fields: Map<String, Value>,
    ) -> Result<()> {
        match self {
            CliStore::File(store) => store.set_document(collection, id, fields).await,
            CliStore::Rest(store) => store.set_document(collection, id, fields).await,
        }
    }

    async fn update_document(
        &self,
        collection: Collection,
        id: &RecordId,
        fields: Map<String, Value>,
    ) -> Result<()> {
        match self {
            CliStore::File(store) => store.update_document(collection, id, fields).await,
            CliStore::Rest(store) => store.update_document(collection, id, fields).await,
        }
    }

    async fn delete_document(&self, collection: Collection, id: &RecordId) -> Result<()> {
        match self {
            CliStore::File(store) => store.delete_document(collection, id).await,
            CliStore::Rest(store) => store.delete_document(collection, id).await,
        }
    }

    async fn increment(
        &self,
        collection: Collection,
        id: &RecordId,
        field: &str,
        delta: i64,
    ) -> Result<()> {
        match self {
            CliStore::File(store) => store.increment(collection, id, field, delta).await,
            CliStore::Rest(store) => store.increment(collection, id, field, delta).await,
        }
    }
}
