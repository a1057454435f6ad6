//! File-backed [`Store`] implementation.

use std::cmp::Ordering;
use std::path::Path;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::{debug, instrument};
use uuid::Uuid;

use agora_core::error::{Error, InvalidInputError, ProtocolError};
use agora_core::repo::{
    CREATED_AT, OrderBy, QueryPage, RawDocument, SortDirection, StoreQuery, UPDATED_AT,
    compare_values,
};
use agora_core::{Collection, RecordId, Result, Store, StoreUrl};

use crate::cursor::Position;
use crate::disk::Disk;

/// A document store kept in a local directory.
///
/// Behaves like a hosted document database with no composite indexes: a
/// query may filter on one field or order by one field, but ordering by a
/// field other than the filtered one is rejected.
#[derive(Debug, Clone)]
pub struct FileStore {
    disk: Disk,
    url: StoreUrl,
}

impl FileStore {
    /// Open (or lazily create) a store rooted at `root`.
    pub fn new(root: impl AsRef<Path>, url: StoreUrl) -> Self {
        Self {
            disk: Disk::new(root),
            url,
        }
    }

    /// Open the store a `file://` URL points at.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not a local file URL.
    pub fn from_url(url: StoreUrl) -> Result<Self> {
        let root = url.to_file_path().ok_or_else(|| InvalidInputError::StoreUrl {
            value: url.as_str().to_string(),
            reason: "not a file:// URL".to_string(),
        })?;
        Ok(Self::new(root, url))
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        self.disk.root()
    }

    fn generate_id() -> Result<RecordId> {
        RecordId::new(Uuid::new_v4().simple().to_string())
    }

    fn now() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn stamp_new(fields: &mut Map<String, Value>) {
        let now = Value::String(Self::now());
        fields.insert(CREATED_AT.to_string(), now.clone());
        fields.insert(UPDATED_AT.to_string(), now);
    }
}

fn compare_positions(a: &Position, b: &Position, direction: SortDirection) -> Ordering {
    let by_value = compare_values(Some(&a.value), Some(&b.value));
    let by_value = match direction {
        SortDirection::Asc => by_value,
        SortDirection::Desc => by_value.reverse(),
    };
    by_value.then_with(|| a.id.cmp(&b.id))
}

/// Order documents and return them with their positions.
fn ordered(documents: Vec<RawDocument>, order_by: Option<&OrderBy>) -> Vec<(Position, RawDocument)> {
    let field = order_by.map(|o| o.field.as_str());
    let direction = order_by.map_or(SortDirection::Asc, |o| o.direction);

    let mut positioned: Vec<_> = documents
        .into_iter()
        .map(|doc| (Position::of(&doc, field), doc))
        .collect();
    positioned.sort_by(|(a, _), (b, _)| compare_positions(a, b, direction));
    positioned
}

#[async_trait]
impl Store for FileStore {
    fn url(&self) -> &StoreUrl {
        &self.url
    }

    #[instrument(skip(self, query), fields(%collection))]
    async fn run_query(&self, collection: Collection, query: &StoreQuery) -> Result<QueryPage> {
        if let (Some(filter), Some(order)) = (&query.filter, &query.order_by)
            && filter.field != order.field
        {
            return Err(ProtocolError::missing_index(&filter.field, &order.field).into());
        }

        let mut documents = self.disk.scan(collection)?;
        if let Some(filter) = &query.filter {
            documents.retain(|doc| filter.matches(doc));
        }

        let direction = query
            .order_by
            .as_ref()
            .map_or(SortDirection::Asc, |o| o.direction);
        let mut positioned = ordered(documents, query.order_by.as_ref());

        if let Some(cursor) = &query.start_after {
            let after = Position::decode(cursor)?;
            positioned.retain(|(position, _)| {
                compare_positions(position, &after, direction) == Ordering::Greater
            });
        }

        if let Some(limit) = query.limit {
            positioned.truncate(limit as usize);
        }

        let last = match positioned.last() {
            Some((position, _)) => Some(position.encode()?),
            None => None,
        };
        let documents: Vec<_> = positioned.into_iter().map(|(_, doc)| doc).collect();

        debug!(count = documents.len(), "Queried records");
        Ok(QueryPage { documents, last })
    }

    #[instrument(skip(self), fields(%collection, %id))]
    async fn get_document(&self, collection: Collection, id: &RecordId) -> Result<RawDocument> {
        self.disk
            .read(collection, id)?
            .ok_or_else(|| Error::not_found(collection, id))
    }

    #[instrument(skip(self, fields), fields(%collection))]
    async fn add_document(
        &self,
        collection: Collection,
        mut fields: Map<String, Value>,
    ) -> Result<RecordId> {
        let id = Self::generate_id()?;
        Self::stamp_new(&mut fields);

        let _lock = self.disk.lock()?;
        self.disk.write(collection, &id, &fields)?;

        debug!(%id, "Added record");
        Ok(id)
    }

    #[instrument(skip(self, fields), fields(%collection, %id))]
    async fn set_document(
        &self,
        collection: Collection,
        id: &RecordId,
        mut fields: Map<String, Value>,
    ) -> Result<()> {
        Self::stamp_new(&mut fields);

        let _lock = self.disk.lock()?;
        self.disk.write(collection, id, &fields)?;

        debug!("Set record");
        Ok(())
    }

    #[instrument(skip(self, fields), fields(%collection, %id))]
    async fn update_document(
        &self,
        collection: Collection,
        id: &RecordId,
        fields: Map<String, Value>,
    ) -> Result<()> {
        let _lock = self.disk.lock()?;
        let mut doc = self
            .disk
            .read(collection, id)?
            .ok_or_else(|| Error::not_found(collection, id))?;

        doc.fields.extend(fields);
        doc.fields
            .insert(UPDATED_AT.to_string(), Value::String(Self::now()));
        self.disk.write(collection, id, &doc.fields)?;

        debug!("Updated record");
        Ok(())
    }

    #[instrument(skip(self), fields(%collection, %id))]
    async fn delete_document(&self, collection: Collection, id: &RecordId) -> Result<()> {
        let _lock = self.disk.lock()?;
        if self.disk.remove(collection, id)? {
            debug!("Deleted record");
        }
        Ok(())
    }

    #[instrument(skip(self), fields(%collection, %id))]
    async fn increment(
        &self,
        collection: Collection,
        id: &RecordId,
        field: &str,
        delta: i64,
    ) -> Result<()> {
        let _lock = self.disk.lock()?;
        let mut doc = self
            .disk
            .read(collection, id)?
            .ok_or_else(|| Error::not_found(collection, id))?;

        let current = match doc.fields.get(field) {
            None | Some(Value::Null) => 0,
            Some(value) => value.as_i64().ok_or_else(|| InvalidInputError::Other {
                message: format!("field '{}' of {}/{} is not an integer", field, collection, id),
            })?,
        };
        doc.fields
            .insert(field.to_string(), Value::from(current + delta));
        self.disk.write(collection, id, &doc.fields)?;

        debug!(field, value = current + delta, "Incremented counter");
        Ok(())
    }
}
