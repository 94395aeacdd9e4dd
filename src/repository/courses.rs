//! Course accessors

use bson::{doc, oid::ObjectId, DateTime, Document};
use serde::{Deserialize, Serialize};

use crate::db::schemas::{CourseDoc, UserDoc, COURSE_COLLECTION, USER_COLLECTION};
use crate::db::{MongoClient, MongoCollection, PlannedQuery};
use crate::types::{EduHubError, Result};

/// Price bounds used when the caller has no preference
pub const DEFAULT_PRICE_RANGE: (f64, f64) = (50.0, 200.0);

/// A course joined with its instructor, if the instructor exists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseWithInstructor {
    pub course: CourseDoc,
    #[serde(default)]
    pub instructor: Option<UserDoc>,
}

/// Accessors for the `courses` collection
#[derive(Debug, Clone)]
pub struct CourseRepository {
    collection: MongoCollection<CourseDoc>,
}

impl CourseRepository {
    pub fn new(mongo: &MongoClient) -> Self {
        Self {
            collection: mongo.collection::<CourseDoc>(COURSE_COLLECTION),
        }
    }

    pub fn collection(&self) -> &MongoCollection<CourseDoc> {
        &self.collection
    }

    pub async fn create_course(&self, course: CourseDoc) -> Result<ObjectId> {
        self.collection.insert_one(course).await
    }

    pub async fn insert_many(&self, courses: Vec<CourseDoc>) -> Result<usize> {
        self.collection.insert_many(courses).await
    }

    /// Get a course by domain ID
    pub async fn get(&self, course_id: &str) -> Result<Option<CourseDoc>> {
        self.collection.find_one(doc! { "courseId": course_id }).await
    }

    pub fn course_with_instructor_pipeline(course_id: &str) -> Vec<Document> {
        vec![
            doc! { "$match": { "courseId": course_id } },
            doc! {
                "$lookup": {
                    "from": USER_COLLECTION,
                    "localField": "instructorId",
                    "foreignField": "userId",
                    "as": "instructor",
                }
            },
            doc! {
                "$project": {
                    "_id": 0,
                    "course": "$$ROOT",
                    "instructor": { "$arrayElemAt": ["$instructor", 0] },
                }
            },
        ]
    }

    pub fn course_with_instructor_query(course_id: &str) -> PlannedQuery {
        PlannedQuery::aggregate(
            COURSE_COLLECTION,
            Self::course_with_instructor_pipeline(course_id),
        )
    }

    /// A course with its instructor joined in; `None` when the course is missing
    pub async fn get_course_with_instructor(
        &self,
        course_id: &str,
    ) -> Result<Option<CourseWithInstructor>> {
        let mut rows: Vec<CourseWithInstructor> = self
            .collection
            .aggregate(Self::course_with_instructor_pipeline(course_id))
            .await?;
        Ok(rows.pop())
    }

    pub fn by_category_query(category: &str) -> PlannedQuery {
        PlannedQuery::find(COURSE_COLLECTION, doc! { "category": category })
            .with_sort(doc! { "courseId": 1 })
    }

    pub async fn get_courses_by_category(&self, category: &str) -> Result<Vec<CourseDoc>> {
        self.collection
            .find_planned(Self::by_category_query(category))
            .await
    }

    pub fn title_search_query(fragment: &str) -> PlannedQuery {
        PlannedQuery::find(
            COURSE_COLLECTION,
            doc! { "title": { "$regex": regex::escape(fragment), "$options": "i" } },
        )
        .with_sort(doc! { "courseId": 1 })
    }

    /// Case-insensitive substring match on title. The fragment is literal
    /// text, not a pattern.
    pub async fn search_courses_by_title(&self, fragment: &str) -> Result<Vec<CourseDoc>> {
        self.collection
            .find_planned(Self::title_search_query(fragment))
            .await
    }

    pub fn price_range_query(min: f64, max: f64) -> PlannedQuery {
        PlannedQuery::find(
            COURSE_COLLECTION,
            doc! { "price": { "$gte": min, "$lte": max } },
        )
        .with_sort(doc! { "price": 1, "courseId": 1 })
    }

    /// Courses priced within `[min, max]`, cheapest first
    pub async fn find_courses_in_price_range(&self, min: f64, max: f64) -> Result<Vec<CourseDoc>> {
        if min > max {
            return Err(EduHubError::InvalidInput(format!(
                "price range {}..{} is empty",
                min, max
            )));
        }
        self.collection
            .find_planned(Self::price_range_query(min, max))
            .await
    }

    pub fn any_tag_query(tags: &[String]) -> PlannedQuery {
        PlannedQuery::find(COURSE_COLLECTION, doc! { "tags": { "$in": tags } })
            .with_sort(doc! { "courseId": 1 })
    }

    /// Courses carrying at least one of `tags`
    pub async fn find_courses_with_tags(&self, tags: &[String]) -> Result<Vec<CourseDoc>> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }
        self.collection
            .find_planned(Self::any_tag_query(tags))
            .await
    }

    /// Returns whether the course exists
    pub async fn mark_course_published(&self, course_id: &str) -> Result<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "courseId": course_id },
                doc! { "$set": { "isPublished": true, "updatedAt": DateTime::now() } },
            )
            .await?;

        Ok(result.matched_count > 0)
    }

    /// Add tags with set semantics; tags already present are not repeated
    pub async fn add_tags_to_course(&self, course_id: &str, tags: &[String]) -> Result<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "courseId": course_id },
                doc! {
                    "$addToSet": { "tags": { "$each": tags } },
                    "$set": { "updatedAt": DateTime::now() },
                },
            )
            .await?;

        Ok(result.matched_count > 0)
    }
}
