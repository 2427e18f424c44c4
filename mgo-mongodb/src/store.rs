//! The untyped document store seam behind typed collections.
//!
//! [`DocumentStore`] has one method per store primitive. It is implemented
//! for the driver's `mongodb::Collection<Document>`; typed collections hold
//! an `Arc<dyn DocumentStore>`, so several of them may share one handle.

use std::future::Future;
use std::pin::Pin;

use bson::Document;
use futures::TryStreamExt;
use mgo_query::FindParams;
use mongodb::Collection;
use mongodb::options::{FindOneOptions, FindOptions};

use crate::error::MongoResult;

/// A boxed future used by [`DocumentStore`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Untyped operations against one store collection.
///
/// Implementations pass store failures through unchanged and perform
/// exactly one round-trip per call (cursor draining included).
pub trait DocumentStore: Send + Sync {
    /// Name of the underlying collection.
    fn name(&self) -> &str;

    /// Insert one document.
    fn insert_one(&self, document: Document) -> BoxFuture<'_, MongoResult<()>>;

    /// Insert many documents.
    fn insert_many(&self, documents: Vec<Document>) -> BoxFuture<'_, MongoResult<()>>;

    /// Find the first matching document.
    fn find_one(
        &self,
        filter: Document,
        params: FindParams,
    ) -> BoxFuture<'_, MongoResult<Option<Document>>>;

    /// Find all matching documents.
    fn find(&self, filter: Document, params: FindParams)
    -> BoxFuture<'_, MongoResult<Vec<Document>>>;

    /// Update the first matching document. Returns the matched count.
    fn update_one(&self, filter: Document, update: Document) -> BoxFuture<'_, MongoResult<u64>>;

    /// Update all matching documents. Returns the matched count.
    fn update_many(&self, filter: Document, update: Document)
    -> BoxFuture<'_, MongoResult<u64>>;

    /// Delete the first matching document. Returns the deleted count.
    fn delete_one(&self, filter: Document) -> BoxFuture<'_, MongoResult<u64>>;

    /// Delete all matching documents. Returns the deleted count.
    fn delete_many(&self, filter: Document) -> BoxFuture<'_, MongoResult<u64>>;

    /// Count matching documents.
    fn count_documents(&self, filter: Document) -> BoxFuture<'_, MongoResult<u64>>;

    /// Run an aggregation pipeline.
    fn aggregate(&self, pipeline: Vec<Document>) -> BoxFuture<'_, MongoResult<Vec<Document>>>;
}

/// Convert find parameters to driver find options.
pub fn find_options(params: FindParams) -> FindOptions {
    FindOptions::builder()
        .sort(params.sort)
        .skip(params.skip)
        .limit(params.limit)
        .projection(params.projection)
        .build()
}

/// Convert find parameters to driver find-one options. The limit is ignored.
pub fn find_one_options(params: FindParams) -> FindOneOptions {
    FindOneOptions::builder()
        .sort(params.sort)
        .skip(params.skip)
        .projection(params.projection)
        .build()
}

impl DocumentStore for Collection<Document> {
    fn name(&self) -> &str {
        Collection::name(self)
    }

    fn insert_one(&self, document: Document) -> BoxFuture<'_, MongoResult<()>> {
        Box::pin(async move {
            Collection::insert_one(self, document, None).await?;
            Ok(())
        })
    }

    fn insert_many(&self, documents: Vec<Document>) -> BoxFuture<'_, MongoResult<()>> {
        Box::pin(async move {
            Collection::insert_many(self, documents, None).await?;
            Ok(())
        })
    }

    fn find_one(
        &self,
        filter: Document,
        params: FindParams,
    ) -> BoxFuture<'_, MongoResult<Option<Document>>> {
        Box::pin(async move {
            let found = Collection::find_one(self, filter, find_one_options(params)).await?;
            Ok(found)
        })
    }

    fn find(
        &self,
        filter: Document,
        params: FindParams,
    ) -> BoxFuture<'_, MongoResult<Vec<Document>>> {
        Box::pin(async move {
            let cursor = Collection::find(self, filter, find_options(params)).await?;
            let docs: Vec<Document> = cursor.try_collect().await?;
            Ok(docs)
        })
    }

    fn update_one(&self, filter: Document, update: Document) -> BoxFuture<'_, MongoResult<u64>> {
        Box::pin(async move {
            let result = Collection::update_one(self, filter, update, None).await?;
            Ok(result.matched_count)
        })
    }

    fn update_many(
        &self,
        filter: Document,
        update: Document,
    ) -> BoxFuture<'_, MongoResult<u64>> {
        Box::pin(async move {
            let result = Collection::update_many(self, filter, update, None).await?;
            Ok(result.matched_count)
        })
    }

    fn delete_one(&self, filter: Document) -> BoxFuture<'_, MongoResult<u64>> {
        Box::pin(async move {
            let result = Collection::delete_one(self, filter, None).await?;
            Ok(result.deleted_count)
        })
    }

    fn delete_many(&self, filter: Document) -> BoxFuture<'_, MongoResult<u64>> {
        Box::pin(async move {
            let result = Collection::delete_many(self, filter, None).await?;
            Ok(result.deleted_count)
        })
    }

    fn count_documents(&self, filter: Document) -> BoxFuture<'_, MongoResult<u64>> {
        Box::pin(async move {
            let count = Collection::count_documents(self, filter, None).await?;
            Ok(count)
        })
    }

    fn aggregate(&self, pipeline: Vec<Document>) -> BoxFuture<'_, MongoResult<Vec<Document>>> {
        Box::pin(async move {
            let cursor = Collection::aggregate(self, pipeline, None).await?;
            let docs: Vec<Document> = cursor.try_collect().await?;
            Ok(docs)
        })
    }
}
