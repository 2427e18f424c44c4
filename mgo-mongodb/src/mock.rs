//! Recording store used by unit tests.

use std::sync::Arc;

use bson::Document;
use mgo_query::FindParams;
use parking_lot::Mutex;

use crate::error::{MongoError, MongoResult};
use crate::store::{BoxFuture, DocumentStore};

/// One call received by [`MockStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    InsertOne(Document),
    InsertMany(Vec<Document>),
    FindOne(Document, FindParams),
    Find(Document, FindParams),
    UpdateOne(Document, Document),
    UpdateMany(Document, Document),
    DeleteOne(Document),
    DeleteMany(Document),
    Count(Document),
    Aggregate(Vec<Document>),
}

/// A store that records every call and answers with canned results.
#[derive(Default)]
pub struct MockStore {
    calls: Mutex<Vec<Call>>,
    documents: Vec<Document>,
    count: u64,
    fail: bool,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents returned by `find`, `find_one` and `aggregate`.
    pub fn with_documents(mut self, documents: Vec<Document>) -> Self {
        self.documents = documents;
        self
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }

    /// Make every call fail with a connection error.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn last_call(&self) -> Call {
        self.calls
            .lock()
            .last()
            .cloned()
            .expect("no call was recorded")
    }

    fn record<T: Send + 'static>(&self, call: Call, result: T) -> BoxFuture<'_, MongoResult<T>> {
        self.calls.lock().push(call);
        let fail = self.fail;
        Box::pin(async move {
            if fail {
                return Err(MongoError::connection("store unavailable"));
            }
            Ok(result)
        })
    }
}

impl DocumentStore for MockStore {
    fn name(&self) -> &str {
        "mock"
    }

    fn insert_one(&self, document: Document) -> BoxFuture<'_, MongoResult<()>> {
        self.record(Call::InsertOne(document), ())
    }

    fn insert_many(&self, documents: Vec<Document>) -> BoxFuture<'_, MongoResult<()>> {
        self.record(Call::InsertMany(documents), ())
    }

    fn find_one(
        &self,
        filter: Document,
        params: FindParams,
    ) -> BoxFuture<'_, MongoResult<Option<Document>>> {
        let first = self.documents.first().cloned();
        self.record(Call::FindOne(filter, params), first)
    }

    fn find(
        &self,
        filter: Document,
        params: FindParams,
    ) -> BoxFuture<'_, MongoResult<Vec<Document>>> {
        self.record(Call::Find(filter, params), self.documents.clone())
    }

    fn update_one(&self, filter: Document, update: Document) -> BoxFuture<'_, MongoResult<u64>> {
        self.record(Call::UpdateOne(filter, update), 1)
    }

    fn update_many(
        &self,
        filter: Document,
        update: Document,
    ) -> BoxFuture<'_, MongoResult<u64>> {
        self.record(Call::UpdateMany(filter, update), self.count)
    }

    fn delete_one(&self, filter: Document) -> BoxFuture<'_, MongoResult<u64>> {
        self.record(Call::DeleteOne(filter), 1)
    }

    fn delete_many(&self, filter: Document) -> BoxFuture<'_, MongoResult<u64>> {
        self.record(Call::DeleteMany(filter), self.count)
    }

    fn count_documents(&self, filter: Document) -> BoxFuture<'_, MongoResult<u64>> {
        self.record(Call::Count(filter), self.count)
    }

    fn aggregate(&self, pipeline: Vec<Document>) -> BoxFuture<'_, MongoResult<Vec<Document>>> {
        self.record(Call::Aggregate(pipeline), self.documents.clone())
    }
}
