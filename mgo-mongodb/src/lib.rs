//! # mgo-mongodb
//!
//! Typed MongoDB collections with entity envelopes and soft deletion.
//!
//! This crate provides:
//! - Environment-driven configuration ([`MgoConfig`])
//! - A connected client bound to one database ([`MongoClient`], [`with_client`])
//! - [`Collection<T>`], which stores values exactly as they serialize
//! - [`EntityCollection<T>`], which wraps values in a [`Record`] envelope with
//!   an id, `created_at`, `updated_at` and a soft-delete marker
//! - The [`DocumentStore`] seam both collection tiers run on
//!
//! ## Example
//!
//! ```rust,ignore
//! use mgo_mongodb::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct User {
//!     name: String,
//!     age: i32,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), MongoError> {
//!     let client = MongoClient::from_env().await?;
//!     let users = client.entity_collection::<User>("users");
//!
//!     let alice = users.insert_one(User { name: "Alice".into(), age: 30 }).await?;
//!
//!     users
//!         .update_one([
//!             options::filter(filter::by_id(alice.id())),
//!             options::set(doc! { "age": 31 }),
//!         ])
//!         .await?;
//!
//!     users
//!         .soft_delete_one([options::filter(filter::by_id(alice.id()))])
//!         .await?;
//!
//!     let live = users
//!         .count([options::filter(FilterBuilder::new().not_deleted())])
//!         .await?;
//!     assert_eq!(live, 0);
//!
//!     client.shutdown().await
//! }
//! ```

pub mod client;
pub mod collection;
pub mod config;
pub mod document;
pub mod entity;
pub mod entity_collection;
pub mod error;
pub mod store;

#[cfg(test)]
mod mock;

pub use bson::oid::ObjectId;
pub use bson::{Bson, Document, doc};
pub use client::{MongoClient, with_client};
pub use collection::Collection;
pub use config::{MgoConfig, MgoConfigBuilder};
pub use entity::{Entity, Record};
pub use entity_collection::EntityCollection;
pub use error::{MongoError, MongoResult};
pub use mgo_query::{FilterBuilder, FindParams, QueryOptions, SetOption, fields, filter, options, stages};
pub use store::DocumentStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::client::{MongoClient, with_client};
    pub use crate::collection::Collection;
    pub use crate::config::MgoConfig;
    pub use crate::entity::{Entity, Record};
    pub use crate::entity_collection::EntityCollection;
    pub use crate::error::{MongoError, MongoResult};
    pub use bson::oid::ObjectId;
    pub use bson::{Bson, Document, doc};
    pub use mgo_query::{FilterBuilder, SetOption, filter, options, stages};
}
