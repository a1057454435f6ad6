//! HTTP-backed [`Store`] implementation.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use agora_core::error::Error;
use agora_core::repo::{QueryPage, RawDocument, StoreQuery};
use agora_core::{AccessToken, Collection, RecordId, Result, Store, StoreUrl};

use crate::client::RestClient;
use crate::wire::{
    CreatedResponse, DocumentBody, FieldsBody, IncrementBody, QueryParams, QueryResponse,
};

/// A document store reached over HTTP.
///
/// | operation         | request                                   |
/// |-------------------|-------------------------------------------|
/// | `run_query`       | `GET /v1/{collection}?filterField=..`     |
/// | `get_document`    | `GET /v1/{collection}/{id}`               |
/// | `add_document`    | `POST /v1/{collection}`                   |
/// | `set_document`    | `PUT /v1/{collection}/{id}`               |
/// | `update_document` | `PATCH /v1/{collection}/{id}`             |
/// | `delete_document` | `DELETE /v1/{collection}/{id}`            |
/// | `increment`       | `POST /v1/{collection}/{id}:increment`    |
#[derive(Debug, Clone)]
pub struct RestStore {
    url: StoreUrl,
    client: RestClient,
}

impl RestStore {
    /// Connect to a store, optionally presenting a bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be sent as a header or the HTTP
    /// client cannot be built.
    pub fn new(url: StoreUrl, token: Option<&AccessToken>) -> Result<Self> {
        let client = RestClient::new(url.clone(), token)?;
        Ok(Self { url, client })
    }
}

/// Map a 404 on a single-record operation to `NotFound`.
fn not_found_on_404(err: Error, collection: Collection, id: &RecordId) -> Error {
    match err {
        Error::Protocol(ref protocol) if protocol.status == 404 => Error::not_found(collection, id),
        other => other,
    }
}

#[async_trait]
impl Store for RestStore {
    fn url(&self) -> &StoreUrl {
        &self.url
    }

    #[instrument(skip(self, query), fields(store = %self.url.as_str(), %collection))]
    async fn run_query(&self, collection: Collection, query: &StoreQuery) -> Result<QueryPage> {
        let url = self.client.url(collection, None, "")?;
        let params = QueryParams::from_query(query)?;
        let request = self.client.request(Method::GET, url).query(&params);

        let response: QueryResponse = self.client.fetch(request).await?;
        let documents: Vec<RawDocument> =
            response.documents.into_iter().map(RawDocument::from).collect();

        debug!(count = documents.len(), "Queried records");
        Ok(QueryPage {
            documents,
            last: response.cursor,
        })
    }

    #[instrument(skip(self), fields(store = %self.url.as_str(), %collection, %id))]
    async fn get_document(&self, collection: Collection, id: &RecordId) -> Result<RawDocument> {
        let url = self.client.url(collection, Some(id), "")?;
        let request = self.client.request(Method::GET, url);

        let body: DocumentBody = self
            .client
            .fetch(request)
            .await
            .map_err(|e| not_found_on_404(e, collection, id))?;
        Ok(body.into())
    }

    #[instrument(skip(self, fields), fields(store = %self.url.as_str(), %collection))]
    async fn add_document(
        &self,
        collection: Collection,
        fields: Map<String, Value>,
    ) -> Result<RecordId> {
        let url = self.client.url(collection, None, "")?;
        let request = self
            .client
            .request(Method::POST, url)
            .json(&FieldsBody { fields: &fields });

        let created: CreatedResponse = self.client.fetch(request).await?;
        debug!(id = %created.id, "Added record");
        Ok(created.id)
    }

    #[instrument(skip(self, fields), fields(store = %self.url.as_str(), %collection, %id))]
    async fn set_document(
        &self,
        collection: Collection,
        id: &RecordId,
        fields: Map<String, Value>,
    ) -> Result<()> {
        let url = self.client.url(collection, Some(id), "")?;
        let request = self
            .client
            .request(Method::PUT, url)
            .json(&FieldsBody { fields: &fields });
        self.client.execute(request).await
    }

    #[instrument(skip(self, fields), fields(store = %self.url.as_str(), %collection, %id))]
    async fn update_document(
        &self,
        collection: Collection,
        id: &RecordId,
        fields: Map<String, Value>,
    ) -> Result<()> {
        let url = self.client.url(collection, Some(id), "")?;
        let request = self
            .client
            .request(Method::PATCH, url)
            .json(&FieldsBody { fields: &fields });
        self.client
            .execute(request)
            .await
            .map_err(|e| not_found_on_404(e, collection, id))
    }

    #[instrument(skip(self), fields(store = %self.url.as_str(), %collection, %id))]
    async fn delete_document(&self, collection: Collection, id: &RecordId) -> Result<()> {
        let url = self.client.url(collection, Some(id), "")?;
        let request = self.client.request(Method::DELETE, url);
        match self.client.execute(request).await {
            Err(Error::Protocol(protocol)) if protocol.status == 404 => {
                debug!("Record already absent");
                Ok(())
            }
            other => other,
        }
    }

    #[instrument(skip(self), fields(store = %self.url.as_str(), %collection, %id))]
    async fn increment(
        &self,
        collection: Collection,
        id: &RecordId,
        field: &str,
        delta: i64,
    ) -> Result<()> {
        let url = self.client.url(collection, Some(id), ":increment")?;
        let request = self
            .client
            .request(Method::POST, url)
            .json(&IncrementBody { field, delta });
        self.client
            .execute(request)
            .await
            .map_err(|e| not_found_on_404(e, collection, id))
    }
}
