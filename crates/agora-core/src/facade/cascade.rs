//! Relation upkeep: owner counters and cascading delete.
//!
//! A dependent record (a response) names its owner (a discussion) through a
//! foreign key, and the owner counts its live dependents. Every create or
//! delete of a dependent goes through here so the count moves with it.

use futures_util::future::join_all;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use crate::Result;
use crate::error::{Error, InvalidInputError, PartialCascadeFailure};
use crate::repo::{FieldFilter, StoreQuery};
use crate::traits::Store;
use crate::types::{Collection, RecordId, Relation};

use super::QueryFacade;

/// Outcome of a completed delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    /// Dependents removed before the owner.
    pub dependents_deleted: usize,
}

#[derive(Default)]
struct Progress {
    deleted: usize,
    failed: usize,
    first_error: Option<Error>,
    /// Dependents removed per relation.
    removed: Vec<(&'static Relation, usize)>,
}

impl Progress {
    fn record(&mut self, relation: &'static Relation, results: Vec<Result<()>>) {
        let mut removed = 0;
        for result in results {
            match result {
                Ok(()) => removed += 1,
                Err(e) => {
                    self.failed += 1;
                    self.first_error.get_or_insert(e);
                }
            }
        }
        self.deleted += removed;
        if removed > 0 {
            self.removed.push((relation, removed));
        }
    }

    fn fail(&mut self, err: Error) {
        self.first_error.get_or_insert(err);
    }

    /// Wrap an error as partial only if something was already deleted.
    fn into_error(self, collection: Collection, id: &RecordId, source: Error) -> Error {
        if self.deleted == 0 {
            return source;
        }
        PartialCascadeFailure {
            collection,
            id: id.clone(),
            dependents_deleted: self.deleted,
            dependents_failed: self.failed,
            source: Box::new(source),
        }
        .into()
    }
}

/// The owner id a dependent's foreign key points at.
fn foreign_owner(relation: &Relation, fields: &Map<String, Value>) -> Option<RecordId> {
    fields
        .get(relation.foreign_key)
        .and_then(Value::as_str)
        .and_then(|id| RecordId::new(id).ok())
}

impl<S: Store> QueryFacade<S> {
    /// Delete a record, cascading to its dependents and releasing its owner.
    ///
    /// Dependents are deleted concurrently; the owner is only attempted once
    /// every dependent deletion has finished and all of them succeeded.
    /// Nothing is rolled back on failure. When the cascade stops part way,
    /// the kept owner's counter is reduced by the dependents that are gone;
    /// if that adjustment also fails the counter is left stale.
    ///
    /// Deleting a dependent decrements its owner's counter once the record
    /// is gone. Deleting a record that does not exist succeeds and changes
    /// no counter.
    ///
    /// # Errors
    ///
    /// Returns `PartialCascadeFailure` if some dependents were deleted before
    /// a failure, or the underlying error if nothing was deleted.
    #[instrument(skip(self), fields(%collection, %id))]
    pub async fn delete(&self, collection: Collection, id: &RecordId) -> Result<CascadeReport> {
        let owner = self.owner_of_existing(collection, id).await?;
        let mut progress = Progress::default();

        for relation in collection.relations() {
            let query = StoreQuery {
                filter: Some(FieldFilter::equals(relation.foreign_key, id.as_str())),
                ..Default::default()
            };

            let dependents = match self.store.run_query(relation.dependents, &query).await {
                Ok(page) => page.documents,
                Err(e) => {
                    progress.fail(e);
                    break;
                }
            };

            debug!(
                dependents = dependents.len(),
                collection = %relation.dependents,
                "Deleting dependents"
            );

            let results = join_all(
                dependents
                    .iter()
                    .map(|doc| self.store.delete_document(relation.dependents, &doc.id)),
            )
            .await;
            progress.record(relation, results);

            if progress.first_error.is_some() {
                break;
            }
        }

        if let Some(source) = progress.first_error.take() {
            warn!(
                deleted = progress.deleted,
                failed = progress.failed,
                error = %source,
                "Cascade stopped before owner delete"
            );
            self.recount_kept_owner(id, &progress.removed).await;
            return Err(progress.into_error(collection, id, source));
        }

        if let Err(source) = self.store.delete_document(collection, id).await {
            warn!(deleted = progress.deleted, error = %source, "Owner delete failed after cascade");
            self.recount_kept_owner(id, &progress.removed).await;
            return Err(progress.into_error(collection, id, source));
        }

        if let Some((relation, owner_id)) = owner {
            self.release_owner(relation, &owner_id).await?;
        }

        debug!(dependents = progress.deleted, "Deleted record");
        Ok(CascadeReport {
            dependents_deleted: progress.deleted,
        })
    }

    /// For a dependent about to be deleted, the relation and owner it counts toward.
    async fn owner_of_existing(
        &self,
        collection: Collection,
        id: &RecordId,
    ) -> Result<Option<(&'static Relation, RecordId)>> {
        let Some(relation) = collection.owner_relation() else {
            return Ok(None);
        };
        let doc = match self.store.get_document(collection, id).await {
            Ok(doc) => doc,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };
        let owner = foreign_owner(relation, &doc.fields);
        if owner.is_none() {
            warn!(field = relation.foreign_key, "Dependent has no owner reference");
        }
        Ok(owner.map(|owner_id| (relation, owner_id)))
    }

    async fn release_owner(&self, relation: &Relation, owner_id: &RecordId) -> Result<()> {
        match self
            .adjust_counter(relation.owner, owner_id, relation.counter, -1)
            .await
        {
            Err(e) if e.is_not_found() => {
                debug!(%owner_id, "Owner already deleted");
                Ok(())
            }
            other => other,
        }
    }

    async fn recount_kept_owner(&self, id: &RecordId, removed: &[(&'static Relation, usize)]) {
        for (relation, count) in removed {
            let delta = -(*count as i64);
            if let Err(e) = self
                .adjust_counter(relation.owner, id, relation.counter, delta)
                .await
            {
                warn!(counter = relation.counter, error = %e, "Owner counter left stale");
            }
        }
    }

    /// Resolve and check the owner a new dependent will count toward.
    pub(super) async fn require_owner(
        &self,
        collection: Collection,
        relation: &Relation,
        fields: &Map<String, Value>,
    ) -> Result<RecordId> {
        let owner_id =
            foreign_owner(relation, fields).ok_or_else(|| InvalidInputError::Schema {
                collection,
                reason: format!("'{}' must name a {} record", relation.foreign_key, relation.owner),
            })?;
        self.store.get_document(relation.owner, &owner_id).await?;
        Ok(owner_id)
    }

    /// Count a newly created dependent on its owner, removing it again if that fails.
    pub(super) async fn attach_to_owner(
        &self,
        collection: Collection,
        id: &RecordId,
        relation: &Relation,
        owner_id: &RecordId,
    ) -> Result<()> {
        let Err(e) = self
            .adjust_counter(relation.owner, owner_id, relation.counter, 1)
            .await
        else {
            return Ok(());
        };
        warn!(%id, error = %e, "Owner counter update failed, removing new record");
        if let Err(cleanup) = self.store.delete_document(collection, id).await {
            warn!(%id, error = %cleanup, "Failed to remove uncounted record");
        }
        Err(e)
    }
}
