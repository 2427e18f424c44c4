//! The entity envelope attached to records on insert.
//!
//! An envelope holds the identity and audit fields of a stored record:
//!
//! | Field | Type | Notes |
//! |---|---|---|
//! | `_id` | ObjectId | generated on insert |
//! | `created_at` | DateTime | set on insert |
//! | `updated_at` | DateTime | set on insert, refreshed by every update |
//! | `deleted_at` | DateTime | absent until soft delete |
//!
//! The envelope fields and the value fields share one document namespace.
//! Value types must not use these field names.
//!
//! Envelope fields left out by a projection decode as zero values: the
//! all-zero ObjectId and the Unix epoch.

use std::ops::{Deref, DerefMut};

use bson::{DateTime, Document, oid::ObjectId};
use chrono::Utc;
use mgo_query::fields;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::ser::{self, Serializer};
use serde::{Deserialize, Serialize};

use crate::document::{from_document, to_document};
use crate::error::MongoResult;

const ENVELOPE_FIELDS: [&str; 4] = [
    fields::ID,
    fields::CREATED_AT,
    fields::UPDATED_AT,
    fields::DELETED_AT,
];

fn zero_id() -> ObjectId {
    ObjectId::from_bytes([0; 12])
}

fn epoch() -> DateTime {
    DateTime::from_millis(0)
}

/// Identity and audit fields of a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "_id", default = "zero_id")]
    id: ObjectId,
    #[serde(default = "epoch")]
    created_at: DateTime,
    #[serde(default = "epoch")]
    updated_at: DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deleted_at: Option<DateTime>,
}

impl Entity {
    /// Create a fresh envelope: new id, created and updated now, not deleted.
    pub fn new() -> Self {
        let now = DateTime::now();
        Self {
            id: ObjectId::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// The record identifier.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// When the record was inserted.
    pub fn created_at(&self) -> DateTime {
        self.created_at
    }

    /// When the record was last updated.
    pub fn updated_at(&self) -> DateTime {
        self.updated_at
    }

    /// When the record was soft-deleted, if it was.
    pub fn deleted_at(&self) -> Option<DateTime> {
        self.deleted_at
    }

    /// Check whether the record has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Creation time as a chrono timestamp.
    pub fn created_at_utc(&self) -> chrono::DateTime<Utc> {
        self.created_at.to_chrono()
    }

    /// Last update time as a chrono timestamp.
    pub fn updated_at_utc(&self) -> chrono::DateTime<Utc> {
        self.updated_at.to_chrono()
    }

    /// Soft-delete time as a chrono timestamp.
    pub fn deleted_at_utc(&self) -> Option<chrono::DateTime<Utc>> {
        self.deleted_at.map(DateTime::to_chrono)
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

/// A value of `T` together with its envelope.
///
/// Encoded as one flat document: the envelope fields followed by the fields
/// of `T`. Dereferences to `T`.
///
/// ```rust,ignore
/// let record = Record::wrap(User { name: "a".into() });
/// assert_eq!(record.name, "a");
/// assert!(!record.entity().is_deleted());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Record<T> {
    entity: Entity,
    value: T,
}

impl<T> Record<T> {
    /// Wrap a value in a fresh envelope.
    pub fn wrap(value: T) -> Self {
        Self {
            entity: Entity::new(),
            value,
        }
    }

    /// Pair an existing envelope with a value.
    pub fn from_parts(entity: Entity, value: T) -> Self {
        Self { entity, value }
    }

    /// The envelope.
    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    /// The record identifier.
    pub fn id(&self) -> ObjectId {
        self.entity.id
    }

    /// The wrapped value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Discard the envelope.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Split into envelope and value.
    pub fn into_parts(self) -> (Entity, T) {
        (self.entity, self.value)
    }
}

impl<T: Serialize> Record<T> {
    /// Encode as a flat document, envelope fields first.
    ///
    /// `T` must encode to a document (a struct or a map).
    pub fn to_document(&self) -> MongoResult<Document> {
        let mut document = to_document(&self.entity)?;
        document.extend(to_document(&self.value)?);
        Ok(document)
    }
}

impl<T: DeserializeOwned> Record<T> {
    /// Decode a flat document, splitting the envelope fields off before
    /// decoding `T` from the remaining fields.
    pub fn from_document(mut document: Document) -> MongoResult<Self> {
        let mut envelope = Document::new();
        for field in ENVELOPE_FIELDS {
            if let Some(value) = document.remove(field) {
                envelope.insert(field, value);
            }
        }

        Ok(Self {
            entity: from_document(envelope)?,
            value: from_document(document)?,
        })
    }
}

impl<T> Deref for Record<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> DerefMut for Record<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T: Serialize> Serialize for Record<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_document()
            .map_err(ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Record<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let document = Document::deserialize(deserializer)?;
        Self::from_document(document).map_err(de::Error::custom)
    }
}
