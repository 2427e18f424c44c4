//! Call-scoped query options built from composable mutators.
//!
//! Every collection operation accepts a sequence of [`SetOption`] values.
//! They are folded, in order, over a default [`QueryOptions`] and the result
//! is used for exactly one store call.
//!
//! ```rust
//! use bson::doc;
//! use mgo_query::options::{self, QueryOptions};
//!
//! let opts = QueryOptions::bind([
//!     options::filter(doc! { "status": "active" }),
//!     options::sort(doc! { "created_at": -1 }),
//!     options::limit(20),
//! ]);
//!
//! assert_eq!(opts.limit, Some(20));
//! assert!(opts.skip.is_none());
//! ```

use std::fmt;

use bson::{Bson, DateTime, Document};

use crate::fields;

/// The update operator that stamps are merged into.
pub const SET_OPERATOR: &str = "$set";

/// Options for a single collection operation.
///
/// A default value matches every document, changes nothing, applies no
/// ordering or projection and does not paginate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    /// Selection predicate. Empty matches everything.
    pub filter: Document,
    /// Update document (`$set`, `$unset`, ...). Empty changes nothing.
    pub update: Document,
    /// Sort specification.
    pub sort: Option<Document>,
    /// Field projection.
    pub projection: Option<Document>,
    /// Aggregation pipeline stages, in order.
    pub pipeline: Vec<Document>,
    /// Number of documents to skip.
    pub skip: Option<u64>,
    /// Maximum number of documents to return.
    pub limit: Option<i64>,
}

/// Find-time parameters derived from [`QueryOptions`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindParams {
    /// Sort specification.
    pub sort: Option<Document>,
    /// Number of documents to skip. `None` means no offset.
    pub skip: Option<u64>,
    /// Maximum number of documents. `None` means no limit.
    pub limit: Option<i64>,
    /// Field projection.
    pub projection: Option<Document>,
}

impl FindParams {
    /// Check whether no find parameter is set.
    pub fn is_empty(&self) -> bool {
        self.sort.is_none() && self.skip.is_none() && self.limit.is_none() && self.projection.is_none()
    }
}

impl QueryOptions {
    /// Apply each mutator in order to a default value.
    pub fn bind(options: impl IntoIterator<Item = SetOption>) -> Self {
        let mut opts = Self::default();
        for option in options {
            option.apply(&mut opts);
        }
        opts
    }

    /// Project the sort, skip, limit and projection fields.
    pub fn find_params(&self) -> FindParams {
        FindParams {
            sort: self.sort.clone(),
            skip: self.skip,
            limit: self.limit,
            projection: self.projection.clone(),
        }
    }

    /// Stamp `updated_at` with the current time into the `$set` operator.
    ///
    /// Caller-supplied `$set` fields are kept.
    pub fn stamp_update(&mut self) {
        self.stamp_update_at(DateTime::now());
    }

    /// Stamp `updated_at` with `now` into the `$set` operator.
    pub fn stamp_update_at(&mut self, now: DateTime) {
        match self.update.get_mut(SET_OPERATOR) {
            Some(Bson::Document(set)) => {
                set.insert(fields::UPDATED_AT, now);
            }
            // A non-document `$set` would be rejected by the server anyway.
            _ => {
                self.update
                    .insert(SET_OPERATOR, single_field(fields::UPDATED_AT, now));
            }
        }
    }

    /// Replace the whole `$set` operator with `deleted_at` set to the current time.
    ///
    /// Any other `$set` fields are discarded. Other update operators are left as-is.
    pub fn stamp_soft_delete(&mut self) {
        self.stamp_soft_delete_at(DateTime::now());
    }

    /// Replace the whole `$set` operator with `deleted_at` set to `now`.
    pub fn stamp_soft_delete_at(&mut self, now: DateTime) {
        self.update
            .insert(SET_OPERATOR, single_field(fields::DELETED_AT, now));
    }
}

fn single_field(key: &str, value: impl Into<Bson>) -> Document {
    let mut document = Document::new();
    document.insert(key, value);
    document
}

/// A mutator applied to [`QueryOptions`] before an operation runs.
pub struct SetOption(Box<dyn FnOnce(&mut QueryOptions) + Send>);

impl SetOption {
    /// Wrap a closure as an option mutator.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(&mut QueryOptions) + Send + 'static,
    {
        Self(Box::new(f))
    }

    /// Apply the mutator.
    pub fn apply(self, options: &mut QueryOptions) {
        (self.0)(options)
    }
}

impl fmt::Debug for SetOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SetOption(..)")
    }
}

/// Set the filter document.
pub fn filter(filter: impl Into<Document>) -> SetOption {
    let filter = filter.into();
    SetOption::new(move |o| o.filter = filter)
}

/// Set the update document.
pub fn update(update: impl Into<Document>) -> SetOption {
    let update = update.into();
    SetOption::new(move |o| o.update = update)
}

/// Set the update document to `{ "$set": fields }`.
pub fn set(fields: Document) -> SetOption {
    update(single_field(SET_OPERATOR, fields))
}

/// Set the sort specification.
pub fn sort(sort: Document) -> SetOption {
    SetOption::new(move |o| o.sort = Some(sort))
}

/// Set the projection.
pub fn projection(projection: Document) -> SetOption {
    SetOption::new(move |o| o.projection = Some(projection))
}

/// Replace the aggregation pipeline.
pub fn pipeline(stages: Vec<Document>) -> SetOption {
    SetOption::new(move |o| o.pipeline = stages)
}

/// Append one stage to the aggregation pipeline.
pub fn add_stage(stage: Document) -> SetOption {
    SetOption::new(move |o| o.pipeline.push(stage))
}

/// Set the number of documents to skip.
pub fn skip(skip: u64) -> SetOption {
    SetOption::new(move |o| o.skip = Some(skip))
}

/// Set the maximum number of documents to return.
pub fn limit(limit: i64) -> SetOption {
    SetOption::new(move |o| o.limit = Some(limit))
}

/// Paginate with a 1-based page number.
///
/// Page 0 is treated as page 1. A page size of 0 clears skip and limit
/// instead of sending `limit: 0`, which the server reads as "no limit".
pub fn page(page: u64, page_size: u64) -> SetOption {
    if page_size == 0 {
        return SetOption::new(|o| {
            o.skip = None;
            o.limit = None;
        });
    }
    let skip = page.saturating_sub(1).saturating_mul(page_size);
    let limit = i64::try_from(page_size).unwrap_or(i64::MAX);
    SetOption::new(move |o| {
        o.skip = Some(skip);
        o.limit = Some(limit);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_options_are_empty() {
        let opts = QueryOptions::default();
        assert!(opts.filter.is_empty());
        assert!(opts.update.is_empty());
        assert!(opts.sort.is_none());
        assert!(opts.projection.is_none());
        assert!(opts.pipeline.is_empty());
        assert!(opts.skip.is_none());
        assert!(opts.limit.is_none());
    }

    #[test]
    fn test_bind_no_options() {
        let opts = QueryOptions::bind([]);
        assert_eq!(opts, QueryOptions::default());
    }

    #[test]
    fn test_bind_disjoint_fields() {
        let opts = QueryOptions::bind([
            limit(5),
            filter(doc! { "name": "a" }),
            sort(doc! { "name": 1 }),
            skip(10),
        ]);

        assert_eq!(opts.filter, doc! { "name": "a" });
        assert_eq!(opts.sort, Some(doc! { "name": 1 }));
        assert_eq!(opts.skip, Some(10));
        assert_eq!(opts.limit, Some(5));
    }

    #[test]
    fn test_bind_last_write_wins() {
        let opts = QueryOptions::bind([
            filter(doc! { "name": "a" }),
            filter(doc! { "age": 3 }),
            pipeline(vec![doc! { "$match": {} }]),
            pipeline(vec![doc! { "$limit": 1 }]),
        ]);

        assert_eq!(opts.filter, doc! { "age": 3 });
        assert_eq!(opts.pipeline, vec![doc! { "$limit": 1 }]);
    }

    #[test]
    fn test_add_stage_appends() {
        let opts = QueryOptions::bind([
            add_stage(doc! { "$match": { "name": "a" } }),
            add_stage(doc! { "$sort": { "name": 1 } }),
        ]);

        assert_eq!(
            opts.pipeline,
            vec![
                doc! { "$match": { "name": "a" } },
                doc! { "$sort": { "name": 1 } },
            ]
        );
    }

    #[test]
    fn test_find_params_keeps_absent_pagination() {
        let opts = QueryOptions::bind([filter(doc! { "name": "a" })]);
        let params = opts.find_params();

        assert!(params.is_empty());
        assert_eq!(params.skip, None);
        assert_eq!(params.limit, None);
    }

    #[test]
    fn test_find_params_projection() {
        let opts = QueryOptions::bind([
            sort(doc! { "created_at": -1 }),
            projection(doc! { "name": 1 }),
            skip(2),
            limit(3),
        ]);

        assert_eq!(
            opts.find_params(),
            FindParams {
                sort: Some(doc! { "created_at": -1 }),
                skip: Some(2),
                limit: Some(3),
                projection: Some(doc! { "name": 1 }),
            }
        );
    }

    #[test]
    fn test_page() {
        let opts = QueryOptions::bind([page(3, 25)]);
        assert_eq!(opts.skip, Some(50));
        assert_eq!(opts.limit, Some(25));

        let opts = QueryOptions::bind([page(0, 25)]);
        assert_eq!(opts.skip, Some(0));
    }

    #[test]
    fn test_page_size_zero_clears_pagination() {
        let opts = QueryOptions::bind([skip(4), limit(2), page(2, 0)]);
        assert_eq!(opts.skip, None);
        assert_eq!(opts.limit, None);
        assert!(opts.find_params().is_empty());
    }

    #[test]
    fn test_stamp_update_on_empty_update() {
        let now = DateTime::from_millis(1_000);
        let mut opts = QueryOptions::default();
        opts.stamp_update_at(now);

        assert_eq!(opts.update, doc! { "$set": { "updated_at": now } });
    }

    #[test]
    fn test_stamp_update_keeps_caller_set_fields() {
        let now = DateTime::from_millis(1_000);
        let mut opts = QueryOptions::bind([update(doc! {
            "$set": { "name": "b" },
            "$inc": { "visits": 1 },
        })]);
        opts.stamp_update_at(now);

        assert_eq!(
            opts.update,
            doc! {
                "$set": { "name": "b", "updated_at": now },
                "$inc": { "visits": 1 },
            }
        );
    }

    #[test]
    fn test_stamp_update_adds_set_next_to_other_operators() {
        let now = DateTime::from_millis(1_000);
        let mut opts = QueryOptions::bind([update(doc! { "$unset": { "nickname": "" } })]);
        opts.stamp_update_at(now);

        assert_eq!(
            opts.update,
            doc! {
                "$unset": { "nickname": "" },
                "$set": { "updated_at": now },
            }
        );
    }

    #[test]
    fn test_stamp_update_replaces_malformed_set() {
        let now = DateTime::from_millis(1_000);
        let mut opts = QueryOptions::bind([update(doc! { "$set": "oops" })]);
        opts.stamp_update_at(now);

        assert_eq!(opts.update, doc! { "$set": { "updated_at": now } });
    }

    #[test]
    fn test_stamp_soft_delete_discards_set_fields() {
        let now = DateTime::from_millis(2_000);
        let mut opts = QueryOptions::bind([
            set(doc! { "name": "b" }),
            filter(doc! { "name": "a" }),
        ]);
        opts.stamp_soft_delete_at(now);

        let set = opts.update.get_document("$set").unwrap();
        assert_eq!(set, &doc! { "deleted_at": now });
        assert!(!set.contains_key("name"));
        assert_eq!(opts.filter, doc! { "name": "a" });
    }

    #[test]
    fn test_stamp_soft_delete_keeps_other_operators() {
        let now = DateTime::from_millis(2_000);
        let mut opts = QueryOptions::bind([update(doc! { "$inc": { "deletions": 1 } })]);
        opts.stamp_soft_delete_at(now);

        assert_eq!(
            opts.update,
            doc! {
                "$inc": { "deletions": 1 },
                "$set": { "deleted_at": now },
            }
        );
    }

    #[test]
    fn test_set_option_debug() {
        assert_eq!(format!("{:?}", limit(1)), "SetOption(..)");
    }
}
