//! Aggregation pipeline stage helpers.

use bson::{Bson, Document, doc};

/// Create a $match stage.
pub fn match_stage(filter: impl Into<Document>) -> Document {
    doc! { "$match": filter.into() }
}

/// Create a $project stage.
pub fn project_stage(projection: Document) -> Document {
    doc! { "$project": projection }
}

/// Create a $group stage.
pub fn group_stage(id: impl Into<Bson>, accumulators: Document) -> Document {
    let mut stage = doc! { "_id": id.into() };
    stage.extend(accumulators);
    doc! { "$group": stage }
}

/// Create a $sort stage.
pub fn sort_stage(sort: Document) -> Document {
    doc! { "$sort": sort }
}

/// Create a $limit stage.
pub fn limit_stage(limit: i64) -> Document {
    doc! { "$limit": limit }
}

/// Create a $skip stage.
pub fn skip_stage(skip: i64) -> Document {
    doc! { "$skip": skip }
}

/// Create a $count stage.
pub fn count_stage(field_name: &str) -> Document {
    doc! { "$count": field_name }
}

/// Accumulator: $sum
pub fn sum(expression: impl Into<Bson>) -> Document {
    doc! { "$sum": expression.into() }
}
