//! # mgo-query
//!
//! Composable query options for typed MongoDB collections.
//!
//! This crate provides:
//! - [`QueryOptions`], the call-scoped filter/update/sort/projection/pipeline/pagination record
//! - [`SetOption`] mutators and their constructors in [`options`]
//! - The `updated_at` and soft-delete stamps applied by update operations
//! - [`FilterBuilder`] and pipeline [`stages`] helpers
//!
//! ## Example
//!
//! ```rust
//! use bson::doc;
//! use mgo_query::{FilterBuilder, QueryOptions, options, stages};
//!
//! let opts = QueryOptions::bind([
//!     options::filter(FilterBuilder::new().eq("name", "a").not_deleted()),
//!     options::add_stage(stages::match_stage(doc! { "name": "a" })),
//!     options::page(2, 10),
//! ]);
//!
//! assert_eq!(opts.skip, Some(10));
//! assert_eq!(opts.pipeline.len(), 1);
//! ```

pub mod filter;
pub mod options;
pub mod stages;

/// Field names written by the entity envelope.
pub mod fields {
    /// Record identifier.
    pub const ID: &str = "_id";
    /// Creation timestamp.
    pub const CREATED_AT: &str = "created_at";
    /// Last update timestamp.
    pub const UPDATED_AT: &str = "updated_at";
    /// Soft-delete timestamp, absent until the record is soft-deleted.
    pub const DELETED_AT: &str = "deleted_at";
}

pub use filter::FilterBuilder;
pub use options::{FindParams, QueryOptions, SetOption};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::filter::FilterBuilder;
    pub use crate::options::{
        self, FindParams, QueryOptions, SetOption, add_stage, filter, limit, page, pipeline,
        projection, set, skip, sort, update,
    };
    pub use crate::stages;
}
