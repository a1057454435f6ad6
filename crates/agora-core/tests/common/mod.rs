//! In-memory store used by the facade and forum tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use agora_core::error::{ProtocolError, TransportError};
use agora_core::repo::{
    CREATED_AT, QueryPage, RawDocument, StoreQuery, UPDATED_AT, compare_values,
};
use agora_core::{Collection, Cursor, Error, RecordId, Result, SortDirection, Store, StoreUrl};
use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::{Map, Value};

#[derive(Default)]
struct State {
    collections: HashMap<Collection, BTreeMap<RecordId, Map<String, Value>>>,
    next_id: u64,
    clock: i64,
    queries: Vec<(Collection, StoreQuery)>,
    failing_deletes: HashSet<(Collection, RecordId)>,
    fail_queries: bool,
}

/// A store holding everything in a mutex, with a logical clock so that
/// every write gets a strictly later timestamp.
pub struct MemoryStore {
    url: StoreUrl,
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            url: StoreUrl::new("https://memory.test").unwrap(),
            state: Mutex::new(State::default()),
        }
    }

    /// Make every delete of this record fail with a transport error.
    pub fn fail_delete(&self, collection: Collection, id: &RecordId) {
        self.state
            .lock()
            .unwrap()
            .failing_deletes
            .insert((collection, id.clone()));
    }

    /// Make every query fail with a transport error.
    pub fn fail_queries(&self) {
        self.state.lock().unwrap().fail_queries = true;
    }

    /// Queries issued so far.
    pub fn queries(&self) -> Vec<(Collection, StoreQuery)> {
        self.state.lock().unwrap().queries.clone()
    }

    pub fn len(&self, collection: Collection) -> usize {
        self.state
            .lock()
            .unwrap()
            .collections
            .get(&collection)
            .map_or(0, BTreeMap::len)
    }

    /// Insert a document with explicit fields, bypassing timestamp stamping.
    pub fn insert_raw(&self, collection: Collection, id: &str, fields: Value) {
        let Value::Object(fields) = fields else {
            panic!("expected object");
        };
        self.state
            .lock()
            .unwrap()
            .collections
            .entry(collection)
            .or_default()
            .insert(RecordId::new(id).unwrap(), fields);
    }
}

impl State {
    fn tick(&mut self) -> String {
        self.clock += 1;
        let base: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().unwrap();
        (base + Duration::seconds(self.clock)).to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn documents(&mut self, collection: Collection) -> &mut BTreeMap<RecordId, Map<String, Value>> {
        self.collections.entry(collection).or_default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn url(&self) -> &StoreUrl {
        &self.url
    }

    async fn run_query(&self, collection: Collection, query: &StoreQuery) -> Result<QueryPage> {
        let mut state = self.state.lock().unwrap();
        state.queries.push((collection, query.clone()));

        if state.fail_queries {
            return Err(TransportError::Timeout.into());
        }
        if let (Some(filter), Some(order)) = (&query.filter, &query.order_by)
            && filter.field != order.field
        {
            return Err(ProtocolError::missing_index(&filter.field, &order.field).into());
        }

        let mut documents: Vec<RawDocument> = state
            .documents(collection)
            .iter()
            .map(|(id, fields)| RawDocument::new(id.clone(), fields.clone()))
            .filter(|doc| query.filter.as_ref().is_none_or(|f| f.matches(doc)))
            .collect();

        if let Some(order) = &query.order_by {
            documents.sort_by(|a, b| {
                let ord = compare_values(a.get(&order.field), b.get(&order.field));
                let ord = match order.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                };
                ord.then_with(|| a.id.cmp(&b.id))
            });
        }

        if let Some(cursor) = &query.start_after {
            let position = documents
                .iter()
                .position(|doc| doc.id.as_str() == cursor.as_str())
                .map_or(documents.len(), |p| p + 1);
            documents.drain(..position);
        }

        if let Some(limit) = query.limit {
            documents.truncate(limit as usize);
        }

        let last = documents.last().map(|doc| Cursor::new(doc.id.as_str()));
        Ok(QueryPage { documents, last })
    }

    async fn get_document(&self, collection: Collection, id: &RecordId) -> Result<RawDocument> {
        let mut state = self.state.lock().unwrap();
        state
            .documents(collection)
            .get(id)
            .map(|fields| RawDocument::new(id.clone(), fields.clone()))
            .ok_or_else(|| Error::not_found(collection, id))
    }

    async fn add_document(
        &self,
        collection: Collection,
        fields: Map<String, Value>,
    ) -> Result<RecordId> {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = RecordId::new(format!("doc-{:04}", state.next_id))?;
        let now = state.tick();
        let mut fields = fields;
        fields.insert(CREATED_AT.into(), Value::String(now.clone()));
        fields.insert(UPDATED_AT.into(), Value::String(now));
        state.documents(collection).insert(id.clone(), fields);
        Ok(id)
    }

    async fn set_document(
        &self,
        collection: Collection,
        id: &RecordId,
        fields: Map<String, Value>,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let now = state.tick();
        let mut fields = fields;
        fields.insert(CREATED_AT.into(), Value::String(now.clone()));
        fields.insert(UPDATED_AT.into(), Value::String(now));
        state.documents(collection).insert(id.clone(), fields);
        Ok(())
    }

    async fn update_document(
        &self,
        collection: Collection,
        id: &RecordId,
        fields: Map<String, Value>,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let now = state.tick();
        let existing = state
            .documents(collection)
            .get_mut(id)
            .ok_or_else(|| Error::not_found(collection, id))?;
        existing.extend(fields);
        existing.insert(UPDATED_AT.into(), Value::String(now));
        Ok(())
    }

    async fn delete_document(&self, collection: Collection, id: &RecordId) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.failing_deletes.contains(&(collection, id.clone())) {
            return Err(TransportError::Connection {
                message: "connection reset".into(),
            }
            .into());
        }
        state.documents(collection).remove(id);
        Ok(())
    }

    async fn increment(
        &self,
        collection: Collection,
        id: &RecordId,
        field: &str,
        delta: i64,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let existing = state
            .documents(collection)
            .get_mut(id)
            .ok_or_else(|| Error::not_found(collection, id))?;
        let current = existing.get(field).and_then(Value::as_i64).unwrap_or(0);
        existing.insert(field.to_string(), Value::from(current + delta));
        Ok(())
    }
}
