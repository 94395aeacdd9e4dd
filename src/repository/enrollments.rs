//! Enrollment accessors

use bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

use crate::db::schemas::{EnrollmentDoc, UserDoc, ENROLLMENT_COLLECTION, USER_COLLECTION};
use crate::db::{MongoClient, MongoCollection, PlannedQuery};
use crate::repository::validate_percentage;
use crate::types::Result;

/// An enrollment joined with its student, if the student exists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentWithStudent {
    pub enrollment: EnrollmentDoc,
    #[serde(default)]
    pub student: Option<UserDoc>,
}

/// Accessors for the `enrollments` collection
#[derive(Debug, Clone)]
pub struct EnrollmentRepository {
    collection: MongoCollection<EnrollmentDoc>,
}

impl EnrollmentRepository {
    pub fn new(mongo: &MongoClient) -> Self {
        Self {
            collection: mongo.collection::<EnrollmentDoc>(ENROLLMENT_COLLECTION),
        }
    }

    pub fn collection(&self) -> &MongoCollection<EnrollmentDoc> {
        &self.collection
    }

    pub async fn enroll_student(&self, enrollment: EnrollmentDoc) -> Result<ObjectId> {
        validate_percentage("progress", enrollment.progress)?;
        self.collection.insert_one(enrollment).await
    }

    pub async fn insert_many(&self, enrollments: Vec<EnrollmentDoc>) -> Result<usize> {
        for enrollment in &enrollments {
            validate_percentage("progress", enrollment.progress)?;
        }
        self.collection.insert_many(enrollments).await
    }

    pub async fn get(&self, enrollment_id: &str) -> Result<Option<EnrollmentDoc>> {
        self.collection
            .find_one(doc! { "enrollmentId": enrollment_id })
            .await
    }

    pub fn students_in_course_pipeline(course_id: &str) -> Vec<Document> {
        vec![
            doc! { "$match": { "courseId": course_id } },
            doc! {
                "$lookup": {
                    "from": USER_COLLECTION,
                    "localField": "studentId",
                    "foreignField": "userId",
                    "as": "student",
                }
            },
            doc! {
                "$project": {
                    "_id": 0,
                    "enrollment": "$$ROOT",
                    "student": { "$arrayElemAt": ["$student", 0] },
                }
            },
            doc! { "$sort": { "enrollment.enrollmentId": 1 } },
        ]
    }

    pub fn students_in_course_query(course_id: &str) -> PlannedQuery {
        PlannedQuery::aggregate(
            ENROLLMENT_COLLECTION,
            Self::students_in_course_pipeline(course_id),
        )
    }

    /// Every enrollment in a course with the enrolled student joined in
    pub async fn get_students_in_course(&self, course_id: &str) -> Result<Vec<EnrollmentWithStudent>> {
        self.collection
            .aggregate(Self::students_in_course_pipeline(course_id))
            .await
    }

    /// Hard delete; returns whether the enrollment existed
    pub async fn delete_enrollment(&self, enrollment_id: &str) -> Result<bool> {
        self.collection
            .delete_one(doc! { "enrollmentId": enrollment_id })
            .await
    }
}
