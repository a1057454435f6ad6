//! Query facade over a [`Store`].
//!
//! The store can filter on one field, or order and page on one field, but
//! not both at once without a composite index. [`QueryFacade::list`] picks
//! a strategy per request:
//!
//! - **Filtered**: fetch one capped batch matching the filter, sort it in
//!   memory, return it whole with no cursor. This is an approximation: with
//!   more matches than the cap, the batch is an arbitrary subset.
//! - **Unfiltered**: let the store order and page, and hand back a cursor
//!   to the last record when the page came back full.
//!
//! Free-text search is applied in memory after retrieval in both modes.

mod cascade;
mod request;
mod sort;

use serde_json::Map;
use tracing::{debug, instrument, warn};

use crate::Result;
use crate::config::FacadeConfig;
use crate::error::InvalidInputError;
use crate::repo::{FieldFilter, RawDocument, Record, SortDirection, StoreQuery};
use crate::schema::{AnyDocument, AnyPatch, Document, search_fields, to_fields};
use crate::traits::Store;
use crate::types::{Collection, RecordId};

pub use cascade::CascadeReport;
pub use request::{ListMode, ListRequest, POPULARITY_FIELD, Page, SortKey};

use sort::sort_documents;

/// Filtered, sorted, paginated and searchable access to a document store.
#[derive(Debug, Clone)]
pub struct QueryFacade<S> {
    store: S,
    config: FacadeConfig,
}

impl<S: Store> QueryFacade<S> {
    /// Create a facade with the default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, FacadeConfig::default())
    }

    pub fn with_config(store: S, config: FacadeConfig) -> Self {
        Self { store, config }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &FacadeConfig {
        &self.config
    }

    /// List records of a collection.
    ///
    /// # Errors
    ///
    /// Fails with a fetch error if the store query fails. No retry is attempted.
    #[instrument(skip(self, request), fields(%collection, filtered = request.filter.is_some()))]
    pub async fn list(
        &self,
        collection: Collection,
        request: &ListRequest,
    ) -> Result<Page<RawDocument>> {
        let mut page = match &request.filter {
            Some(filter) => self.list_filtered(collection, filter, request).await?,
            None => self.list_paged(collection, request).await?,
        };

        if let Some(term) = &request.search {
            let needle = term.to_lowercase();
            let fields = search_fields(collection);
            page.items.retain(|doc| doc.matches_text(fields, &needle));
        }

        debug!(count = page.items.len(), more = page.next_cursor.is_some(), "Listed records");
        Ok(page)
    }

    /// List records decoded into their schema.
    pub async fn list_as<D: Document>(&self, request: &ListRequest) -> Result<Page<Record<D>>> {
        self.list(D::COLLECTION, request)
            .await?
            .try_map(RawDocument::into_record)
    }

    async fn list_filtered(
        &self,
        collection: Collection,
        filter: &FieldFilter,
        request: &ListRequest,
    ) -> Result<Page<RawDocument>> {
        if request.cursor.is_some() {
            warn!("Ignoring cursor: filtered listings are not paginated");
        }

        let query = StoreQuery {
            filter: Some(filter.clone()),
            limit: Some(self.config.filtered_batch_cap),
            ..Default::default()
        };
        let mut documents = self.store.run_query(collection, &query).await?.documents;
        sort_documents(&mut documents, &request.sort, request.direction);

        Ok(Page {
            items: documents,
            next_cursor: None,
            mode: ListMode::FilteredBatch,
        })
    }

    async fn list_paged(
        &self,
        collection: Collection,
        request: &ListRequest,
    ) -> Result<Page<RawDocument>> {
        let page_size = request
            .page_size
            .unwrap_or(self.config.default_page_size)
            .max(1);

        let query = StoreQuery {
            filter: None,
            order_by: Some(request.sort.order_by(request.direction)),
            limit: Some(page_size),
            start_after: request.cursor.clone(),
        };
        let page = self.store.run_query(collection, &query).await?;

        // The cursor tracks what the store returned, not what survives search,
        // so chained pages never skip or repeat records.
        let full = page.documents.len() >= page_size as usize;
        Ok(Page {
            items: page.documents,
            next_cursor: if full { page.last } else { None },
            mode: ListMode::Paged,
        })
    }

    /// Fetch every record matching an optional filter, unpaged.
    ///
    /// With a filter the ordering is applied in memory; without one the
    /// store orders. Used for bounded child listings such as the responses
    /// of one discussion.
    #[instrument(skip(self, filter, order), fields(%collection))]
    pub async fn select(
        &self,
        collection: Collection,
        filter: Option<FieldFilter>,
        order: Option<(SortKey, SortDirection)>,
    ) -> Result<Vec<RawDocument>> {
        let order_by = match (&filter, &order) {
            (None, Some((key, direction))) => Some(key.order_by(*direction)),
            _ => None,
        };
        let query = StoreQuery {
            filter,
            order_by,
            ..Default::default()
        };
        let mut documents = self.store.run_query(collection, &query).await?.documents;

        if query.filter.is_some()
            && let Some((key, direction)) = &order
        {
            sort_documents(&mut documents, key, *direction);
        }

        debug!(count = documents.len(), "Selected records");
        Ok(documents)
    }

    /// [`select`](Self::select) decoded into the schema.
    pub async fn select_as<D: Document>(
        &self,
        filter: Option<FieldFilter>,
        order: Option<(SortKey, SortDirection)>,
    ) -> Result<Vec<Record<D>>> {
        self.select(D::COLLECTION, filter, order)
            .await?
            .into_iter()
            .map(RawDocument::into_record)
            .collect()
    }

    /// Fetch one raw record.
    #[instrument(skip(self), fields(%collection, %id))]
    pub async fn get_raw(&self, collection: Collection, id: &RecordId) -> Result<RawDocument> {
        debug!("Getting record");
        self.store.get_document(collection, id).await
    }

    /// Fetch one record. Fails with `NotFound` if it does not exist.
    pub async fn get<D: Document>(&self, id: &RecordId) -> Result<Record<D>> {
        self.get_raw(D::COLLECTION, id).await?.into_record()
    }

    /// Create a record; the store assigns the id and timestamps.
    #[instrument(skip(self, document), fields(collection = %D::COLLECTION))]
    pub async fn create<D: Document>(&self, document: &D) -> Result<RecordId> {
        let fields = to_fields(D::COLLECTION, document)?;
        self.create_fields(D::COLLECTION, fields).await
    }

    /// Create a record from a collection-tagged document.
    #[instrument(skip(self, document), fields(collection = %document.collection()))]
    pub async fn create_any(&self, document: &AnyDocument) -> Result<RecordId> {
        self.create_fields(document.collection(), document.to_fields()?)
            .await
    }

    /// Dependents must name an existing owner, whose counter is raised
    /// once the record is written.
    async fn create_fields(
        &self,
        collection: Collection,
        fields: Map<String, serde_json::Value>,
    ) -> Result<RecordId> {
        let owner = match collection.owner_relation() {
            Some(relation) => Some((
                relation,
                self.require_owner(collection, relation, &fields).await?,
            )),
            None => None,
        };

        let id = self.store.add_document(collection, fields).await?;
        debug!(%id, "Created record");

        if let Some((relation, owner_id)) = owner {
            self.attach_to_owner(collection, &id, relation, &owner_id)
                .await?;
        }
        Ok(id)
    }

    /// Create or replace a record at a chosen id.
    ///
    /// Not available for dependent collections, whose records must be
    /// created so their owner's counter follows.
    #[instrument(skip(self, document), fields(collection = %D::COLLECTION, %id))]
    pub async fn set<D: Document>(&self, id: &RecordId, document: &D) -> Result<()> {
        if let Some(relation) = D::COLLECTION.owner_relation() {
            return Err(InvalidInputError::Other {
                message: format!(
                    "{} records are counted on their {} owner and cannot be set by id",
                    D::COLLECTION,
                    relation.owner
                ),
            }
            .into());
        }
        let fields = to_fields(D::COLLECTION, document)?;
        self.store.set_document(D::COLLECTION, id, fields).await
    }

    /// Apply a partial update. Fails with `NotFound` if the record does not exist.
    #[instrument(skip(self, patch), fields(collection = %D::COLLECTION, %id))]
    pub async fn update<D: Document>(&self, id: &RecordId, patch: &D::Patch) -> Result<()> {
        let fields = to_fields(D::COLLECTION, patch)?;
        self.store.update_document(D::COLLECTION, id, fields).await
    }

    /// Apply a collection-tagged partial update.
    #[instrument(skip(self, patch), fields(collection = %patch.collection(), %id))]
    pub async fn update_any(&self, id: &RecordId, patch: &AnyPatch) -> Result<()> {
        self.store
            .update_document(patch.collection(), id, patch.to_fields()?)
            .await
    }

    /// Atomically add `delta` to a counter on an owner record.
    ///
    /// [`create`](Self::create) and [`delete`](Self::delete) already keep
    /// relation counters in step; this is for repairs.
    #[instrument(skip(self), fields(%collection, %id))]
    pub async fn adjust_counter(
        &self,
        collection: Collection,
        id: &RecordId,
        field: &str,
        delta: i64,
    ) -> Result<()> {
        debug!(field, delta, "Adjusting counter");
        self.store.increment(collection, id, field, delta).await
    }
}
