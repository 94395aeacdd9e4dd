//! Submission accessors

use bson::{doc, oid::ObjectId};

use crate::db::schemas::{SubmissionDoc, SUBMISSION_COLLECTION};
use crate::db::{MongoClient, MongoCollection, PlannedQuery};
use crate::repository::validate_percentage;
use crate::types::Result;

/// Accessors for the `submissions` collection
#[derive(Debug, Clone)]
pub struct SubmissionRepository {
    collection: MongoCollection<SubmissionDoc>,
}

impl SubmissionRepository {
    pub fn new(mongo: &MongoClient) -> Self {
        Self {
            collection: mongo.collection::<SubmissionDoc>(SUBMISSION_COLLECTION),
        }
    }

    pub fn collection(&self) -> &MongoCollection<SubmissionDoc> {
        &self.collection
    }

    pub async fn submit(&self, submission: SubmissionDoc) -> Result<ObjectId> {
        if let Some(grade) = submission.grade {
            validate_percentage("grade", grade)?;
        }
        self.collection.insert_one(submission).await
    }

    pub async fn insert_many(&self, submissions: Vec<SubmissionDoc>) -> Result<usize> {
        for grade in submissions.iter().filter_map(|s| s.grade) {
            validate_percentage("grade", grade)?;
        }
        self.collection.insert_many(submissions).await
    }

    pub fn for_student_query(student_id: &str) -> PlannedQuery {
        PlannedQuery::find(SUBMISSION_COLLECTION, doc! { "studentId": student_id })
            .with_sort(doc! { "submittedAt": -1 })
    }

    /// A student's submissions, newest first
    pub async fn list_for_student(&self, student_id: &str) -> Result<Vec<SubmissionDoc>> {
        self.collection
            .find_planned(Self::for_student_query(student_id))
            .await
    }

    /// Set the grade of a submission; returns whether it exists
    pub async fn update_assignment_grade(&self, submission_id: &str, grade: f64) -> Result<bool> {
        validate_percentage("grade", grade)?;

        let result = self
            .collection
            .update_one(
                doc! { "submissionId": submission_id },
                doc! { "$set": { "grade": grade } },
            )
            .await?;

        Ok(result.matched_count > 0)
    }
}
