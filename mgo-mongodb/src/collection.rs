//! Typed collections over a [`DocumentStore`].
//!
//! [`Collection<T>`] is the baseline tier: values are stored exactly as `T`
//! serializes, and no fields are added implicitly. Every operation binds its
//! option mutators into one [`QueryOptions`], makes one store call and
//! decodes the result into `T`.
//!
//! # Example
//!
//! ```rust,ignore
//! use mgo_mongodb::prelude::*;
//!
//! let users = client.collection::<User>("users");
//!
//! users.insert_one(User { name: "Alice".into(), age: 30 }).await?;
//!
//! let adults = users
//!     .find_many([
//!         options::filter(FilterBuilder::new().gte("age", 18)),
//!         options::sort(doc! { "name": 1 }),
//!         options::limit(50),
//!     ])
//!     .await?;
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use bson::Document;
use mgo_query::{QueryOptions, SetOption};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::document::{from_document, from_documents, to_document};
use crate::error::{MongoError, MongoResult};
use crate::store::DocumentStore;

/// A collection of `T` values.
///
/// Cheap to clone; clones share the same store handle.
pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.store.name())
            .finish()
    }
}

impl<T> Collection<T> {
    /// Create a collection over a store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// Create a collection over a driver collection handle.
    pub fn from_driver(collection: mongodb::Collection<Document>) -> Self {
        Self::new(Arc::new(collection))
    }

    /// Name of the underlying collection.
    pub fn name(&self) -> &str {
        self.store.name()
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    /// Insert one value.
    pub async fn insert_one(&self, model: T) -> MongoResult<()> {
        let document = to_document(&model)?;
        debug!(collection = %self.name(), "insert_one");
        self.store.insert_one(document).await
    }

    /// Insert many values in one call.
    pub async fn insert_many(&self, models: Vec<T>) -> MongoResult<()> {
        let documents = models
            .iter()
            .map(to_document)
            .collect::<MongoResult<Vec<_>>>()?;
        debug!(collection = %self.name(), count = documents.len(), "insert_many");
        self.store.insert_many(documents).await
    }

    /// Find the first value matching the filter.
    ///
    /// Sort, skip and projection are honoured. No match is reported as
    /// [`MongoError::NotFound`].
    pub async fn find_one(&self, options: impl IntoIterator<Item = SetOption>) -> MongoResult<T> {
        let opts = QueryOptions::bind(options);
        let filter = opts.filter.clone();
        self.find_one_bound(opts).await?.ok_or_else(|| {
            MongoError::not_found(format!("no document in '{}' matches {}", self.name(), filter))
        })
    }

    /// Find the first value matching the filter, if any.
    pub async fn find_optional(
        &self,
        options: impl IntoIterator<Item = SetOption>,
    ) -> MongoResult<Option<T>> {
        self.find_one_bound(QueryOptions::bind(options)).await
    }

    async fn find_one_bound(&self, opts: QueryOptions) -> MongoResult<Option<T>> {
        debug!(collection = %self.name(), filter = %opts.filter, "find_one");
        let params = opts.find_params();
        match self.store.find_one(opts.filter, params).await? {
            Some(document) => Ok(Some(from_document(document)?)),
            None => Ok(None),
        }
    }

    /// Find every value matching the filter, honouring sort, skip, limit and projection.
    pub async fn find_many(
        &self,
        options: impl IntoIterator<Item = SetOption>,
    ) -> MongoResult<Vec<T>> {
        let opts = QueryOptions::bind(options);
        let params = opts.find_params();
        debug!(
            collection = %self.name(),
            filter = %opts.filter,
            skip = ?params.skip,
            limit = ?params.limit,
            "find_many"
        );
        let documents = self.store.find(opts.filter, params).await?;
        from_documents(documents)
    }

    /// Apply the update document to the first match.
    pub async fn update_one(&self, options: impl IntoIterator<Item = SetOption>) -> MongoResult<()> {
        let opts = QueryOptions::bind(options);
        debug!(collection = %self.name(), filter = %opts.filter, update = %opts.update, "update_one");
        let matched = self.store.update_one(opts.filter, opts.update).await?;
        debug!(collection = %self.name(), matched, "update_one done");
        Ok(())
    }

    /// Apply the update document to every match.
    pub async fn update_many(
        &self,
        options: impl IntoIterator<Item = SetOption>,
    ) -> MongoResult<()> {
        let opts = QueryOptions::bind(options);
        debug!(collection = %self.name(), filter = %opts.filter, update = %opts.update, "update_many");
        let matched = self.store.update_many(opts.filter, opts.update).await?;
        debug!(collection = %self.name(), matched, "update_many done");
        Ok(())
    }

    /// Remove the first match.
    pub async fn delete_one(&self, options: impl IntoIterator<Item = SetOption>) -> MongoResult<()> {
        let opts = QueryOptions::bind(options);
        debug!(collection = %self.name(), filter = %opts.filter, "delete_one");
        self.store.delete_one(opts.filter).await?;
        Ok(())
    }

    /// Remove every match.
    pub async fn delete_many(
        &self,
        options: impl IntoIterator<Item = SetOption>,
    ) -> MongoResult<()> {
        let opts = QueryOptions::bind(options);
        debug!(collection = %self.name(), filter = %opts.filter, "delete_many");
        let deleted = self.store.delete_many(opts.filter).await?;
        debug!(collection = %self.name(), deleted, "delete_many done");
        Ok(())
    }

    /// Count matching documents.
    ///
    /// Soft-deleted records are counted unless the filter excludes them.
    pub async fn count(&self, options: impl IntoIterator<Item = SetOption>) -> MongoResult<u64> {
        let opts = QueryOptions::bind(options);
        debug!(collection = %self.name(), filter = %opts.filter, "count");
        self.store.count_documents(opts.filter).await
    }

    /// Run the aggregation pipeline and decode each output document as `T`.
    pub async fn aggregate(
        &self,
        options: impl IntoIterator<Item = SetOption>,
    ) -> MongoResult<Vec<T>> {
        self.aggregate_as(options).await
    }

    /// Run the aggregation pipeline and decode each output document as `U`.
    ///
    /// Use this when stages such as `$group` or `$project` reshape documents.
    pub async fn aggregate_as<U>(
        &self,
        options: impl IntoIterator<Item = SetOption>,
    ) -> MongoResult<Vec<U>>
    where
        U: DeserializeOwned,
    {
        let opts = QueryOptions::bind(options);
        debug!(collection = %self.name(), stages = opts.pipeline.len(), "aggregate");
        let documents = self.store.aggregate(opts.pipeline).await?;
        from_documents(documents)
    }
}
