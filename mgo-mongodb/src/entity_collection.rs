//! Collections of enveloped records.
//!
//! [`EntityCollection<T>`] stores every value inside a [`Record`]: inserts get
//! a fresh id and timestamps, updates refresh `updated_at`, and soft deletes
//! set `deleted_at` instead of removing the document. Reads return whole
//! records so callers can see the envelope.
//!
//! Soft-deleted records stay visible to reads, counts and aggregations unless
//! the filter excludes them, e.g. with [`FilterBuilder::not_deleted`].
//!
//! [`FilterBuilder::not_deleted`]: mgo_query::FilterBuilder::not_deleted

use std::fmt;
use std::iter;
use std::sync::Arc;

use bson::Document;
use bson::oid::ObjectId;
use mgo_query::{SetOption, filter, options};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::collection::Collection;
use crate::entity::Record;
use crate::error::MongoResult;
use crate::store::DocumentStore;

/// A collection of `T` values wrapped in [`Record`] envelopes.
pub struct EntityCollection<T> {
    inner: Collection<Record<T>>,
}

impl<T> Clone for EntityCollection<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> fmt::Debug for EntityCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityCollection")
            .field("name", &self.name())
            .finish()
    }
}

fn stamped_update(options: impl IntoIterator<Item = SetOption>) -> impl Iterator<Item = SetOption> {
    options
        .into_iter()
        .chain(iter::once(SetOption::new(|o| o.stamp_update())))
}

fn stamped_soft_delete(
    options: impl IntoIterator<Item = SetOption>,
) -> impl Iterator<Item = SetOption> {
    options
        .into_iter()
        .chain(iter::once(SetOption::new(|o| o.stamp_soft_delete())))
}

impl<T> EntityCollection<T> {
    /// Create an entity collection over a store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner: Collection::new(store),
        }
    }

    /// Create an entity collection over a driver collection handle.
    pub fn from_driver(collection: mongodb::Collection<Document>) -> Self {
        Self::new(Arc::new(collection))
    }

    /// Name of the underlying collection.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// The record-level collection, with no implicit stamping.
    pub fn inner(&self) -> &Collection<Record<T>> {
        &self.inner
    }
}

impl<T> EntityCollection<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    /// Wrap the value in a fresh envelope and insert it.
    ///
    /// Returns the inserted record.
    pub async fn insert_one(&self, model: T) -> MongoResult<Record<T>> {
        let record = Record::wrap(model);
        let document = record.to_document()?;
        debug!(collection = %self.name(), id = %record.id(), "insert_one");
        self.inner.store().insert_one(document).await?;
        Ok(record)
    }

    /// Wrap each value in its own envelope and insert them in one call.
    pub async fn insert_many(&self, models: Vec<T>) -> MongoResult<Vec<Record<T>>> {
        let records: Vec<Record<T>> = models.into_iter().map(Record::wrap).collect();
        let documents = records
            .iter()
            .map(Record::to_document)
            .collect::<MongoResult<Vec<_>>>()?;
        debug!(collection = %self.name(), count = documents.len(), "insert_many");
        self.inner.store().insert_many(documents).await?;
        Ok(records)
    }

    /// Find the first matching record.
    pub async fn find_one(
        &self,
        options: impl IntoIterator<Item = SetOption>,
    ) -> MongoResult<Record<T>> {
        self.inner.find_one(options).await
    }

    /// Find the first matching record, if any.
    pub async fn find_optional(
        &self,
        options: impl IntoIterator<Item = SetOption>,
    ) -> MongoResult<Option<Record<T>>> {
        self.inner.find_optional(options).await
    }

    /// Find a record by id.
    pub async fn find_by_id(&self, id: ObjectId) -> MongoResult<Record<T>> {
        self.inner.find_one([options::filter(filter::by_id(id))]).await
    }

    /// Find every matching record.
    pub async fn find_many(
        &self,
        options: impl IntoIterator<Item = SetOption>,
    ) -> MongoResult<Vec<Record<T>>> {
        self.inner.find_many(options).await
    }

    /// Update the first match and refresh its `updated_at`.
    pub async fn update_one(&self, options: impl IntoIterator<Item = SetOption>) -> MongoResult<()> {
        self.inner.update_one(stamped_update(options)).await
    }

    /// Update every match and refresh its `updated_at`.
    pub async fn update_many(
        &self,
        options: impl IntoIterator<Item = SetOption>,
    ) -> MongoResult<()> {
        self.inner.update_many(stamped_update(options)).await
    }

    /// Mark the first match as deleted.
    ///
    /// Replaces any caller `$set` with `{ deleted_at: now }`. Other update
    /// operators are sent unchanged.
    pub async fn soft_delete_one(
        &self,
        options: impl IntoIterator<Item = SetOption>,
    ) -> MongoResult<()> {
        self.inner.update_one(stamped_soft_delete(options)).await
    }

    /// Mark every match as deleted.
    pub async fn soft_delete_many(
        &self,
        options: impl IntoIterator<Item = SetOption>,
    ) -> MongoResult<()> {
        self.inner.update_many(stamped_soft_delete(options)).await
    }

    /// Physically remove the first match.
    pub async fn delete_one(&self, options: impl IntoIterator<Item = SetOption>) -> MongoResult<()> {
        self.inner.delete_one(options).await
    }

    /// Physically remove every match.
    pub async fn delete_many(
        &self,
        options: impl IntoIterator<Item = SetOption>,
    ) -> MongoResult<()> {
        self.inner.delete_many(options).await
    }

    /// Count matching records, soft-deleted ones included.
    pub async fn count(&self, options: impl IntoIterator<Item = SetOption>) -> MongoResult<u64> {
        self.inner.count(options).await
    }

    /// Run the aggregation pipeline and decode each output as a record.
    pub async fn aggregate(
        &self,
        options: impl IntoIterator<Item = SetOption>,
    ) -> MongoResult<Vec<Record<T>>> {
        self.inner.aggregate(options).await
    }

    /// Run the aggregation pipeline and decode each output as `U`.
    pub async fn aggregate_as<U>(
        &self,
        options: impl IntoIterator<Item = SetOption>,
    ) -> MongoResult<Vec<U>>
    where
        U: DeserializeOwned,
    {
        self.inner.aggregate_as(options).await
    }
}
