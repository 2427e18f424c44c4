//! # mgo
//!
//! Typed MongoDB collections for Rust.
//!
//! mgo provides:
//! - Environment-driven connection configuration
//! - Typed collections that encode and decode values through serde
//! - Entity envelopes with an id, creation and update timestamps
//! - Soft deletion through a `deleted_at` marker
//! - Composable, call-scoped query options
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mgo::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! pub struct Order {
//!     pub customer: String,
//!     pub total: i64,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), MongoError> {
//!     let open = with_client(MgoConfig::from_env()?, |client| async move {
//!         let orders = client.entity_collection::<Order>("orders");
//!         orders
//!             .insert_one(Order { customer: "acme".into(), total: 120 })
//!             .await?;
//!         orders
//!             .find_many([
//!                 options::filter(FilterBuilder::new().eq("customer", "acme").not_deleted()),
//!                 options::sort(doc! { "created_at": -1 }),
//!                 options::page(1, 20),
//!             ])
//!             .await
//!     })
//!     .await??;
//!
//!     println!("{} open orders", open.len());
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Query options, filters and pipeline stages.
pub mod query {
    pub use mgo_query::*;
}

/// Configuration, client and typed collections.
pub mod mongo {
    pub use mgo_mongodb::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use mgo_mongodb::prelude::*;
}

// Re-export key types at the crate root
pub use mgo_mongodb::{
    Collection, DocumentStore, Entity, EntityCollection, MgoConfig, MongoClient, MongoError,
    MongoResult, Record, with_client,
};
pub use mgo_query::{FilterBuilder, QueryOptions, SetOption, options};
