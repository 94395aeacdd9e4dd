//! Lesson accessors

use bson::{doc, oid::ObjectId};

use crate::db::schemas::{LessonDoc, LESSON_COLLECTION};
use crate::db::{MongoClient, MongoCollection, PlannedQuery};
use crate::types::Result;

/// Accessors for the `lessons` collection
#[derive(Debug, Clone)]
pub struct LessonRepository {
    collection: MongoCollection<LessonDoc>,
}

impl LessonRepository {
    pub fn new(mongo: &MongoClient) -> Self {
        Self {
            collection: mongo.collection::<LessonDoc>(LESSON_COLLECTION),
        }
    }

    pub fn collection(&self) -> &MongoCollection<LessonDoc> {
        &self.collection
    }

    pub async fn add_lesson_to_course(&self, lesson: LessonDoc) -> Result<ObjectId> {
        self.collection.insert_one(lesson).await
    }

    pub async fn insert_many(&self, lessons: Vec<LessonDoc>) -> Result<usize> {
        self.collection.insert_many(lessons).await
    }

    pub fn for_course_query(course_id: &str) -> PlannedQuery {
        PlannedQuery::find(LESSON_COLLECTION, doc! { "courseId": course_id })
            .with_sort(doc! { "order": 1, "lessonId": 1 })
    }

    /// Lessons of a course in teaching order
    pub async fn list_for_course(&self, course_id: &str) -> Result<Vec<LessonDoc>> {
        self.collection
            .find_planned(Self::for_course_query(course_id))
            .await
    }

    /// Hard delete; returns whether the lesson existed
    pub async fn remove_lesson(&self, lesson_id: &str) -> Result<bool> {
        self.collection
            .delete_one(doc! { "lessonId": lesson_id })
            .await
    }
}
