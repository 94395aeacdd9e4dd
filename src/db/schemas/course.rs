//! Course document schema

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;

/// Collection name for courses
pub const COURSE_COLLECTION: &str = "courses";

/// Difficulty level
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

/// Course document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CourseDoc {
    /// MongoDB document ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub mongo_id: Option<ObjectId>,

    /// Domain identifier (e.g. "c001")
    pub course_id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    /// `userId` of the owning instructor
    pub instructor_id: String,

    pub category: String,

    pub level: Level,

    /// Total length in hours
    pub duration: f64,

    pub price: f64,

    #[serde(default)]
    pub tags: Vec<String>,

    pub created_at: DateTime,

    pub updated_at: DateTime,

    #[serde(default)]
    pub is_published: bool,

    /// Average learner rating; unrated courses carry no field at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl CourseDoc {
    /// Create a new unpublished, unrated course
    pub fn new(
        course_id: impl Into<String>,
        title: impl Into<String>,
        instructor_id: impl Into<String>,
        category: impl Into<String>,
        level: Level,
        price: f64,
    ) -> Self {
        let now = DateTime::now();
        Self {
            mongo_id: None,
            course_id: course_id.into(),
            title: title.into(),
            description: String::new(),
            instructor_id: instructor_id.into(),
            category: category.into(),
            level,
            duration: 0.0,
            price,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
            is_published: false,
            rating: None,
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

impl IntoIndexes for CourseDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(doc! { "title": 1, "category": 1 }, None)]
    }
}
