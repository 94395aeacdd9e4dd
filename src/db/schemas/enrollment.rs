//! Enrollment document schema
//!
//! Links a student to a course and tracks progress through it.

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;

/// Collection name for enrollments
pub const ENROLLMENT_COLLECTION: &str = "enrollments";

/// Enrollment document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentDoc {
    /// MongoDB document ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub mongo_id: Option<ObjectId>,

    /// Domain identifier (e.g. "e001")
    pub enrollment_id: String,

    /// `userId` of the enrolled student
    pub student_id: String,

    pub course_id: String,

    pub enrolled_at: DateTime,

    /// Percentage of the course completed, 0-100
    #[serde(default)]
    pub progress: f64,

    #[serde(default)]
    pub completed: bool,
}

impl EnrollmentDoc {
    /// Fresh enrollment with no progress
    pub fn new(
        enrollment_id: impl Into<String>,
        student_id: impl Into<String>,
        course_id: impl Into<String>,
        enrolled_at: DateTime,
    ) -> Self {
        Self {
            mongo_id: None,
            enrollment_id: enrollment_id.into(),
            student_id: student_id.into(),
            course_id: course_id.into(),
            enrolled_at,
            progress: 0.0,
            completed: false,
        }
    }

    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = progress;
        self
    }
}

impl IntoIndexes for EnrollmentDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(doc! { "studentId": 1, "courseId": 1 }, None)]
    }
}
