//! Document conversion utilities.

use bson::{Document, oid::ObjectId};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::MongoResult;

/// Convert a struct to a BSON document.
pub fn to_document<T: Serialize + ?Sized>(value: &T) -> MongoResult<Document> {
    Ok(bson::to_document(value)?)
}

/// Convert a BSON document to a struct.
pub fn from_document<T: DeserializeOwned>(doc: Document) -> MongoResult<T> {
    Ok(bson::from_document(doc)?)
}

/// Decode every document, stopping at the first failure.
pub fn from_documents<T: DeserializeOwned>(docs: Vec<Document>) -> MongoResult<Vec<T>> {
    docs.into_iter().map(from_document).collect()
}

/// Parse an ObjectId from a string.
pub fn parse_object_id(s: &str) -> MongoResult<ObjectId> {
    Ok(ObjectId::parse_str(s)?)
}
