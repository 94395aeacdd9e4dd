//! Repository accessors
//!
//! One repository per entity kind. Each method maps a single logical
//! operation onto a single MongoDB call; records are addressed by their
//! domain identifier (`userId`, `courseId`, ...).

mod assignments;
mod courses;
mod enrollments;
mod lessons;
mod submissions;
mod users;

pub use assignments::AssignmentRepository;
pub use courses::{CourseRepository, CourseWithInstructor, DEFAULT_PRICE_RANGE};
pub use enrollments::{EnrollmentRepository, EnrollmentWithStudent};
pub use lessons::LessonRepository;
pub use submissions::SubmissionRepository;
pub use users::{ProfileUpdate, UserRepository};

use bson::oid::ObjectId;
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::db::{MongoClient, MongoCollection};
use crate::types::{EduHubError, Result};

/// All repositories bound to one database
#[derive(Debug, Clone)]
pub struct Repositories {
    pub users: UserRepository,
    pub courses: CourseRepository,
    pub enrollments: EnrollmentRepository,
    pub lessons: LessonRepository,
    pub assignments: AssignmentRepository,
    pub submissions: SubmissionRepository,
}

impl Repositories {
    pub fn new(mongo: &MongoClient) -> Self {
        Self {
            users: UserRepository::new(mongo),
            courses: CourseRepository::new(mongo),
            enrollments: EnrollmentRepository::new(mongo),
            lessons: LessonRepository::new(mongo),
            assignments: AssignmentRepository::new(mongo),
            submissions: SubmissionRepository::new(mongo),
        }
    }
}

/// Insert a document, logging the failure before handing it back.
///
/// Callers still get the typed error and must decide what to do with it.
pub async fn insert_with_error_handling<T>(
    collection: &MongoCollection<T>,
    item: T,
) -> Result<ObjectId>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    match collection.insert_one(item).await {
        Ok(id) => Ok(id),
        Err(e) => {
            warn!("Insertion into '{}' failed: {}", collection.name(), e);
            Err(e)
        }
    }
}

/// Reject values outside 0-100
pub(crate) fn validate_percentage(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(EduHubError::InvalidInput(format!(
            "{} {} outside 0-100",
            field, value
        )))
    }
}
