//! Database schemas for EduHub
//!
//! Defines MongoDB document structures for the six entity kinds. Documents
//! reference each other only through domain identifiers (`userId`,
//! `courseId`, ...); nothing enforces that a referenced record exists.

mod assignment;
mod course;
mod enrollment;
mod lesson;
mod submission;
mod user;

pub use assignment::{AssignmentDoc, ASSIGNMENT_COLLECTION};
pub use course::{CourseDoc, Level, COURSE_COLLECTION};
pub use enrollment::{EnrollmentDoc, ENROLLMENT_COLLECTION};
pub use lesson::{LessonDoc, LESSON_COLLECTION};
pub use submission::{SubmissionDoc, SUBMISSION_COLLECTION};
pub use user::{Profile, Role, UserDoc, USER_COLLECTION};

/// Every collection EduHub owns
pub const ALL_COLLECTIONS: [&str; 6] = [
    USER_COLLECTION,
    COURSE_COLLECTION,
    ENROLLMENT_COLLECTION,
    LESSON_COLLECTION,
    ASSIGNMENT_COLLECTION,
    SUBMISSION_COLLECTION,
];
