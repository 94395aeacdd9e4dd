//! Lesson document schema

use bson::{oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;

/// Collection name for lessons
pub const LESSON_COLLECTION: &str = "lessons";

/// Lesson document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LessonDoc {
    /// MongoDB document ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub mongo_id: Option<ObjectId>,

    /// Domain identifier (e.g. "l001")
    pub lesson_id: String,

    pub course_id: String,

    pub title: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub video_url: String,

    /// Length in minutes
    #[serde(default)]
    pub duration: f64,

    /// Position within the course
    #[serde(default)]
    pub order: i32,
}

impl IntoIndexes for LessonDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        Vec::new()
    }
}
