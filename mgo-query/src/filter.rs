//! Filter document building utilities.

use bson::{Bson, Document, doc, oid::ObjectId};

use crate::fields;

/// Builder for MongoDB filter documents.
///
/// Each method inserts one top-level key; adding a second condition on the
/// same field replaces the first. Combine conditions on one field with
/// [`FilterBuilder::and`].
///
/// # Example
///
/// ```rust
/// use mgo_query::FilterBuilder;
///
/// let filter = FilterBuilder::new()
///     .eq("status", "active")
///     .gte("age", 18)
///     .not_deleted()
///     .build();
///
/// assert_eq!(filter.get_str("status").unwrap(), "active");
/// assert!(filter.contains_key("deleted_at"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterBuilder {
    doc: Document,
}

impl FilterBuilder {
    /// Create a new empty filter builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filter builder from an existing document.
    pub fn from_doc(doc: Document) -> Self {
        Self { doc }
    }

    /// Add an equality condition.
    pub fn eq(mut self, field: &str, value: impl Into<Bson>) -> Self {
        self.doc.insert(field, value.into());
        self
    }

    /// Add a not-equal condition.
    pub fn ne(mut self, field: &str, value: impl Into<Bson>) -> Self {
        self.doc.insert(field, doc! { "$ne": value.into() });
        self
    }

    /// Add a greater-than condition.
    pub fn gt(mut self, field: &str, value: impl Into<Bson>) -> Self {
        self.doc.insert(field, doc! { "$gt": value.into() });
        self
    }

    /// Add a greater-than-or-equal condition.
    pub fn gte(mut self, field: &str, value: impl Into<Bson>) -> Self {
        self.doc.insert(field, doc! { "$gte": value.into() });
        self
    }

    /// Add a less-than condition.
    pub fn lt(mut self, field: &str, value: impl Into<Bson>) -> Self {
        self.doc.insert(field, doc! { "$lt": value.into() });
        self
    }

    /// Add a less-than-or-equal condition.
    pub fn lte(mut self, field: &str, value: impl Into<Bson>) -> Self {
        self.doc.insert(field, doc! { "$lte": value.into() });
        self
    }

    /// Add an "in" condition (value in array).
    pub fn in_array(mut self, field: &str, values: Vec<impl Into<Bson>>) -> Self {
        let values: Vec<Bson> = values.into_iter().map(Into::into).collect();
        self.doc.insert(field, doc! { "$in": values });
        self
    }

    /// Add a "not in" condition.
    pub fn not_in(mut self, field: &str, values: Vec<impl Into<Bson>>) -> Self {
        let values: Vec<Bson> = values.into_iter().map(Into::into).collect();
        self.doc.insert(field, doc! { "$nin": values });
        self
    }

    /// Add a regex condition.
    pub fn regex(mut self, field: &str, pattern: &str) -> Self {
        self.doc.insert(field, doc! { "$regex": pattern });
        self
    }

    /// Add an exists condition.
    pub fn exists(mut self, field: &str, exists: bool) -> Self {
        self.doc.insert(field, doc! { "$exists": exists });
        self
    }

    /// Match on `_id`.
    pub fn by_id(mut self, id: ObjectId) -> Self {
        self.doc.insert(fields::ID, id);
        self
    }

    /// Match on `_id` given as a hex string.
    pub fn by_id_str(self, id: &str) -> Result<Self, bson::oid::Error> {
        let oid = ObjectId::parse_str(id)?;
        Ok(self.by_id(oid))
    }

    /// Match only records that have not been soft-deleted.
    pub fn not_deleted(self) -> Self {
        self.exists(fields::DELETED_AT, false)
    }

    /// Match only soft-deleted records.
    pub fn deleted(self) -> Self {
        self.exists(fields::DELETED_AT, true)
    }

    /// Combine with AND ($and).
    pub fn and(mut self, conditions: Vec<Document>) -> Self {
        self.doc.insert("$and", conditions);
        self
    }

    /// Combine with OR ($or).
    pub fn or(mut self, conditions: Vec<Document>) -> Self {
        self.doc.insert("$or", conditions);
        self
    }

    /// Merge another filter into this one.
    pub fn merge(mut self, other: Document) -> Self {
        for (k, v) in other {
            self.doc.insert(k, v);
        }
        self
    }

    /// Build the filter document.
    pub fn build(self) -> Document {
        self.doc
    }

    /// Check if the filter is empty.
    pub fn is_empty(&self) -> bool {
        self.doc.is_empty()
    }
}

impl From<FilterBuilder> for Document {
    fn from(builder: FilterBuilder) -> Self {
        builder.build()
    }
}

/// Create an empty filter (matches all documents).
pub fn all() -> Document {
    Document::new()
}

/// Create an `_id` filter.
pub fn by_id(id: ObjectId) -> Document {
    FilterBuilder::new().by_id(id).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_filter_builder_eq() {
        let filter = FilterBuilder::new()
            .eq("name", "Alice")
            .eq("age", 30)
            .build();

        assert_eq!(filter, doc! { "name": "Alice", "age": 30 });
    }

    #[test]
    fn test_filter_builder_same_field_overwrites() {
        let filter = FilterBuilder::new().gte("age", 18).lt("age", 65).build();
        assert_eq!(filter, doc! { "age": { "$lt": 65 } });
    }

    #[test]
    fn test_filter_builder_in_array() {
        let filter = FilterBuilder::new()
            .in_array("status", vec!["active", "pending"])
            .build();

        assert_eq!(filter, doc! { "status": { "$in": ["active", "pending"] } });
    }

    #[test]
    fn test_filter_builder_or() {
        let filter = FilterBuilder::new()
            .or(vec![
                doc! { "status": "active" },
                doc! { "priority": "high" },
            ])
            .build();

        assert!(filter.contains_key("$or"));
    }

    #[test]
    fn test_filter_builder_by_id() {
        let oid = ObjectId::new();
        let filter = FilterBuilder::new().by_id(oid).build();
        assert_eq!(filter.get_object_id("_id").unwrap(), oid);

        let from_str = FilterBuilder::new().by_id_str(&oid.to_hex()).unwrap().build();
        assert_eq!(filter, from_str);

        assert!(FilterBuilder::new().by_id_str("not-an-id").is_err());
    }

    #[test]
    fn test_soft_delete_filters() {
        let live = FilterBuilder::new().eq("name", "a").not_deleted().build();
        assert_eq!(
            live,
            doc! { "name": "a", "deleted_at": { "$exists": false } }
        );

        let gone = FilterBuilder::new().deleted().build();
        assert_eq!(gone, doc! { "deleted_at": { "$exists": true } });
    }

    #[test]
    fn test_into_document() {
        let doc: Document = FilterBuilder::new().eq("name", "a").into();
        assert_eq!(doc, doc! { "name": "a" });
    }

    #[test]
    fn test_helpers() {
        assert!(all().is_empty());

        let oid = ObjectId::new();
        assert_eq!(by_id(oid), doc! { "_id": oid });
    }
}
