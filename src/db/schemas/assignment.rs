//! Assignment document schema

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;

/// Collection name for assignments
pub const ASSIGNMENT_COLLECTION: &str = "assignments";

/// Assignment document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDoc {
    /// MongoDB document ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub mongo_id: Option<ObjectId>,

    /// Domain identifier (e.g. "a001")
    pub assignment_id: String,

    pub course_id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    pub due_date: DateTime,
}

impl IntoIndexes for AssignmentDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(doc! { "dueDate": 1 }, None)]
    }
}
