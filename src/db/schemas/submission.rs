//! Submission document schema
//!
//! A student's answer to an assignment, with its grade.

use bson::{oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;

/// Collection name for submissions
pub const SUBMISSION_COLLECTION: &str = "submissions";

/// Submission document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDoc {
    /// MongoDB document ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub mongo_id: Option<ObjectId>,

    /// Domain identifier (e.g. "s001")
    pub submission_id: String,

    pub assignment_id: String,

    pub student_id: String,

    pub submitted_at: DateTime,

    #[serde(default)]
    pub content: String,

    /// Score 0-100; ungraded submissions carry no field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<f64>,
}

impl SubmissionDoc {
    /// Ungraded submission made now
    pub fn new(
        submission_id: impl Into<String>,
        assignment_id: impl Into<String>,
        student_id: impl Into<String>,
    ) -> Self {
        Self {
            mongo_id: None,
            submission_id: submission_id.into(),
            assignment_id: assignment_id.into(),
            student_id: student_id.into(),
            submitted_at: DateTime::now(),
            content: String::new(),
            grade: None,
        }
    }

    pub fn with_grade(mut self, grade: f64) -> Self {
        self.grade = Some(grade);
        self
    }
}

impl IntoIndexes for SubmissionDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        Vec::new()
    }
}
