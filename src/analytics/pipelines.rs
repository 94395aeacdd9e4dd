//! Aggregation pipeline definitions
//!
//! Every report is a fixed pipeline literal. Joins use `$lookup` on domain
//! identifiers, so dangling references simply produce no match. Sorted
//! outputs break ties on the group key to keep results deterministic.
//! Documents without a string key for the grouped field are skipped rather
//! than reported under a null key.

use bson::{doc, Document};

use crate::db::schemas::{COURSE_COLLECTION, ENROLLMENT_COLLECTION};

/// Average grade at or above which a student counts as top performing
pub const TOP_STUDENT_MIN_GRADE: f64 = 90.0;

/// Format of the period key in the monthly trend
pub const PERIOD_FORMAT: &str = "%Y-%m";

/// Join each course with its enrollments into `field`
fn lookup_enrollments(field: &str) -> Document {
    doc! {
        "$lookup": {
            "from": ENROLLMENT_COLLECTION,
            "localField": "courseId",
            "foreignField": "courseId",
            "as": field,
        }
    }
}

/// Keep only documents where `field` holds a string
fn keyed(field: &str) -> Document {
    doc! { "$match": { field: { "$type": "string" } } }
}

/// Keep only documents where `field` holds a number
fn numeric(field: &str) -> Document {
    doc! { "$match": { field: { "$type": "number" } } }
}

/// Course-seeded enrollment count; courses without enrollments report 0.
/// Runs on `courses`.
pub fn enrollments_per_course() -> Vec<Document> {
    vec![
        keyed("courseId"),
        lookup_enrollments("enrollments"),
        doc! {
            "$project": {
                "_id": 0,
                "courseId": 1,
                "title": 1,
                "totalEnrollments": { "$size": "$enrollments" },
            }
        },
        doc! { "$sort": { "courseId": 1 } },
    ]
}

/// Runs on `courses`. Unrated courses are filtered out before grouping.
pub fn average_rating_per_course() -> Vec<Document> {
    vec![
        numeric("rating"),
        keyed("courseId"),
        doc! { "$group": { "_id": "$courseId", "avgRating": { "$avg": "$rating" } } },
        doc! { "$sort": { "_id": 1 } },
    ]
}

/// Runs on `courses`.
pub fn courses_per_category() -> Vec<Document> {
    vec![
        keyed("category"),
        doc! { "$group": { "_id": "$category", "totalCourses": { "$sum": 1 } } },
        doc! { "$sort": { "_id": 1 } },
    ]
}

/// Runs on `submissions`. Ungraded submissions are ignored.
pub fn average_grade_per_student() -> Vec<Document> {
    vec![
        numeric("grade"),
        keyed("studentId"),
        doc! { "$group": { "_id": "$studentId", "averageGrade": { "$avg": "$grade" } } },
        doc! { "$sort": { "_id": 1 } },
    ]
}

/// Mean progress per course. Serves as both the completion rate and the
/// engagement metric. Runs on `enrollments`.
pub fn average_progress_per_course() -> Vec<Document> {
    vec![
        numeric("progress"),
        keyed("courseId"),
        doc! { "$group": { "_id": "$courseId", "avgProgress": { "$avg": "$progress" } } },
        doc! { "$sort": { "_id": 1 } },
    ]
}

/// Students averaging at least 90, best first. Runs on `submissions`.
pub fn top_students() -> Vec<Document> {
    let mut pipeline = average_grade_per_student();
    // Replace the key sort with the ranking sort
    pipeline.pop();
    pipeline.push(doc! { "$match": { "averageGrade": { "$gte": TOP_STUDENT_MIN_GRADE } } });
    pipeline.push(doc! { "$sort": { "averageGrade": -1, "_id": 1 } });
    pipeline
}

/// Sum of enrollment counts over each instructor's courses. Runs on `courses`.
pub fn students_per_instructor() -> Vec<Document> {
    vec![
        keyed("instructorId"),
        lookup_enrollments("courseEnrollments"),
        doc! {
            "$group": {
                "_id": "$instructorId",
                "totalStudents": { "$sum": { "$size": "$courseEnrollments" } },
            }
        },
        doc! { "$sort": { "_id": 1 } },
    ]
}

/// Runs on `courses`. Same exclusion rule as the per-course rating.
pub fn average_rating_per_instructor() -> Vec<Document> {
    vec![
        numeric("rating"),
        keyed("instructorId"),
        doc! { "$group": { "_id": "$instructorId", "averageRating": { "$avg": "$rating" } } },
        doc! { "$sort": { "_id": 1 } },
    ]
}

/// `enrollments x price` per course, summed per instructor. Runs on `courses`.
pub fn revenue_per_instructor() -> Vec<Document> {
    vec![
        keyed("instructorId"),
        lookup_enrollments("enrolls"),
        doc! {
            "$project": {
                "instructorId": 1,
                "revenue": {
                    "$multiply": [
                        { "$size": "$enrolls" },
                        { "$ifNull": ["$price", 0.0] },
                    ]
                },
            }
        },
        doc! { "$group": { "_id": "$instructorId", "totalRevenue": { "$sum": "$revenue" } } },
        doc! { "$sort": { "_id": 1 } },
    ]
}

/// Enrollments per `YYYY-MM` (UTC), oldest period first. Runs on `enrollments`.
pub fn monthly_enrollment_trend() -> Vec<Document> {
    vec![
        doc! { "$match": { "enrolledAt": { "$type": "date" } } },
        doc! {
            "$group": {
                "_id": { "$dateToString": { "format": PERIOD_FORMAT, "date": "$enrolledAt" } },
                "totalEnrollments": { "$sum": 1 },
            }
        },
        doc! { "$sort": { "_id": 1 } },
    ]
}

/// Enrollments per course category, most popular first. Enrollments whose
/// course is missing drop out at the unwind. Runs on `enrollments`.
pub fn popular_categories() -> Vec<Document> {
    vec![
        doc! {
            "$lookup": {
                "from": COURSE_COLLECTION,
                "localField": "courseId",
                "foreignField": "courseId",
                "as": "course",
            }
        },
        doc! { "$unwind": "$course" },
        keyed("course.category"),
        doc! { "$group": { "_id": "$course.category", "total": { "$sum": 1 } } },
        doc! { "$sort": { "total": -1, "_id": 1 } },
    ]
}
