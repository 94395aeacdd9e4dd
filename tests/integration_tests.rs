//! Integration tests against a live MongoDB.
//!
//! # Running Integration Tests
//!
//! Integration tests are gated behind the `integration-tests` feature flag
//! and are marked with `#[ignore]` to prevent accidental execution.
//!
//! ```bash
//! export EDUHUB_TEST_MONGODB_URI="mongodb://localhost:27017"
//! cargo test --features integration-tests -- --ignored
//! ```
//!
//! # Test Isolation
//!
//! Every test creates its own throwaway database and drops it at the end,
//! so tests can run in parallel and in any order.

#![cfg(feature = "integration-tests")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use bson::DateTime;
use chrono::{TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use eduhub::analytics::{Analytics, InstructorRevenue};
use eduhub::db::schemas::{
    AssignmentDoc, CourseDoc, EnrollmentDoc, Level, Role, SubmissionDoc, UserDoc,
};
use eduhub::db::MongoClient;
use eduhub::indexes;
use eduhub::instrumentation;
use eduhub::repository::{insert_with_error_handling, ProfileUpdate, Repositories};
use eduhub::seed::SampleData;
use eduhub::EduHubError;

static DB_COUNTER: AtomicUsize = AtomicUsize::new(0);

async fn fresh_db() -> MongoClient {
    let uri = std::env::var("EDUHUB_TEST_MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let suffix = DB_COUNTER.fetch_add(1, Ordering::Relaxed);
    let name = format!("eduhub_test_{}_{}", nanos % 1_000_000_000, suffix);

    MongoClient::new(&uri, &name)
        .await
        .expect("MongoDB reachable at EDUHUB_TEST_MONGODB_URI")
}

fn at(year: i32, month: u32, day: u32) -> DateTime {
    DateTime::from_chrono(Utc.with_ymd_and_hms(year, month, day, 10, 0, 0).unwrap())
}

fn user(id: &str, role: Role) -> UserDoc {
    UserDoc::new(id, format!("{}@example.com", id), "First", "Last", role)
}

fn course(id: &str, instructor: &str, category: &str, price: f64) -> CourseDoc {
    CourseDoc::new(id, format!("Course {}", id), instructor, category, Level::Beginner, price)
}

fn enrollment(id: &str, student: &str, course: &str) -> EnrollmentDoc {
    EnrollmentDoc::new(id, student, course, at(2024, 1, 15))
}

fn graded(id: &str, student: &str, grade: f64) -> SubmissionDoc {
    SubmissionDoc::new(id, "a001", student).with_grade(grade)
}

#[tokio::test]
#[ignore]
async fn test_unrated_courses_do_not_affect_rating_averages() {
    let db = fresh_db().await;
    let repos = Repositories::new(&db);

    repos
        .courses
        .insert_many(vec![
            course("c1", "u1", "Design", 10.0).with_rating(4.0),
            course("c2", "u1", "Design", 10.0).with_rating(2.0),
            course("c3", "u1", "Design", 10.0),
            course("c4", "u2", "Design", 10.0),
        ])
        .await
        .unwrap();

    let analytics = Analytics::new(&db);
    let per_course = analytics.average_rating_per_course().await.unwrap();
    let ids: Vec<&str> = per_course.iter().map(|r| r.course_id.as_str()).collect();
    assert_eq!(ids, vec!["c1", "c2"]);

    let per_instructor = analytics.average_rating_per_instructor().await.unwrap();
    assert_eq!(per_instructor.len(), 1);
    assert_eq!(per_instructor[0].instructor_id, "u1");
    assert_eq!(per_instructor[0].average_rating, 3.0);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_enrollment_count_reports_zero_for_empty_courses() {
    let db = fresh_db().await;
    let repos = Repositories::new(&db);

    repos
        .courses
        .insert_many(vec![
            course("c1", "u1", "Programming", 20.0),
            course("c2", "u1", "Programming", 20.0),
        ])
        .await
        .unwrap();
    repos
        .enrollments
        .insert_many(vec![
            enrollment("e1", "s1", "c1"),
            enrollment("e2", "s2", "c1"),
            // Dangling course reference
            enrollment("e3", "s3", "c404"),
        ])
        .await
        .unwrap();

    let counts = Analytics::new(&db).enrollments_per_course().await.unwrap();
    let summary: Vec<(&str, i64)> = counts
        .iter()
        .map(|c| (c.course_id.as_str(), c.total_enrollments))
        .collect();
    assert_eq!(summary, vec![("c1", 2), ("c2", 0)]);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_revenue_per_instructor() {
    let db = fresh_db().await;
    let repos = Repositories::new(&db);

    repos
        .users
        .insert_many(vec![user("i1", Role::Instructor), user("i2", Role::Instructor)])
        .await
        .unwrap();
    repos
        .courses
        .insert_many(vec![
            course("c1", "i1", "Programming", 100.0),
            course("c2", "i1", "Design", 50.0),
            course("c3", "i2", "Database", 30.0),
        ])
        .await
        .unwrap();
    repos
        .enrollments
        .insert_many(vec![
            enrollment("e1", "s1", "c1"),
            enrollment("e2", "s2", "c1"),
            enrollment("e3", "s1", "c2"),
            enrollment("e4", "s3", "c3"),
            enrollment("e5", "s2", "c3"),
        ])
        .await
        .unwrap();

    let analytics = Analytics::new(&db);
    let revenue = analytics.revenue_per_instructor().await.unwrap();
    assert_eq!(
        revenue,
        vec![
            InstructorRevenue {
                instructor_id: "i1".into(),
                total_revenue: 250.0,
            },
            InstructorRevenue {
                instructor_id: "i2".into(),
                total_revenue: 60.0,
            },
        ]
    );

    let students = analytics.students_per_instructor().await.unwrap();
    let totals: Vec<(&str, i64)> = students
        .iter()
        .map(|s| (s.instructor_id.as_str(), s.total_students))
        .collect();
    assert_eq!(totals, vec![("i1", 3), ("i2", 2)]);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_single_enrollment_revenue_scenario() {
    let db = fresh_db().await;
    let repos = Repositories::new(&db);

    repos.users.add_user(user("u1", Role::Instructor)).await.unwrap();
    repos.users.add_student_user(user("u2", Role::Student)).await.unwrap();
    repos
        .courses
        .create_course(course("c1", "u1", "Programming", 100.0))
        .await
        .unwrap();
    repos
        .enrollments
        .enroll_student(enrollment("e1", "u2", "c1"))
        .await
        .unwrap();

    let revenue = Analytics::new(&db).revenue_per_instructor().await.unwrap();
    assert_eq!(revenue.len(), 1);
    assert_eq!(revenue[0].instructor_id, "u1");
    assert_eq!(revenue[0].total_revenue, 100.0);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_monthly_trend_ascending() {
    let db = fresh_db().await;
    let repos = Repositories::new(&db);

    repos
        .enrollments
        .insert_many(vec![
            EnrollmentDoc::new("e1", "s1", "c1", at(2024, 3, 2)),
            EnrollmentDoc::new("e2", "s2", "c1", at(2024, 1, 20)),
            EnrollmentDoc::new("e3", "s3", "c1", at(2024, 3, 28)),
            EnrollmentDoc::new("e4", "s4", "c1", at(2023, 12, 5)),
        ])
        .await
        .unwrap();

    let trend = Analytics::new(&db).monthly_enrollment_trend().await.unwrap();
    let periods: Vec<(&str, i64)> = trend
        .iter()
        .map(|m| (m.period.as_str(), m.total_enrollments))
        .collect();
    assert_eq!(periods, vec![("2023-12", 1), ("2024-01", 1), ("2024-03", 2)]);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_top_students_boundary_inclusive() {
    let db = fresh_db().await;
    let repos = Repositories::new(&db);

    repos
        .submissions
        .insert_many(vec![
            graded("s1", "exact", 90.0),
            graded("s2", "high", 95.0),
            graded("s3", "high", 99.0),
            graded("s4", "below", 89.99),
            graded("s5", "mixed", 100.0),
            graded("s6", "mixed", 70.0),
            SubmissionDoc::new("s7", "a001", "exact"),
        ])
        .await
        .unwrap();

    let analytics = Analytics::new(&db);
    let top = analytics.top_students().await.unwrap();
    let ranked: Vec<(&str, f64)> = top
        .iter()
        .map(|s| (s.student_id.as_str(), s.average_grade))
        .collect();
    assert_eq!(ranked, vec![("high", 97.0), ("exact", 90.0)]);

    let all = analytics.average_grade_per_student().await.unwrap();
    assert_eq!(all.len(), 4);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_indexes_idempotent_and_email_unique() {
    let db = fresh_db().await;
    let repos = Repositories::new(&db);

    indexes::apply_indexes(&db).await.unwrap();
    indexes::apply_indexes(&db).await.unwrap();

    let names = repos.users.collection().index_names().await.unwrap();
    assert_eq!(names.iter().filter(|n| n.as_str() == "email_1").count(), 1);
    let names = repos.enrollments.collection().index_names().await.unwrap();
    assert!(names.contains(&"studentId_1_courseId_1".to_string()));

    repos.users.add_user(user("u1", Role::Student)).await.unwrap();
    let mut duplicate = user("u2", Role::Student);
    duplicate.email = "u1@example.com".into();

    let err = insert_with_error_handling(repos.users.collection(), duplicate)
        .await
        .unwrap_err();
    assert!(err.is_duplicate_key(), "unexpected error {:?}", err);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_unique_index_fails_on_existing_duplicates() {
    let db = fresh_db().await;
    let repos = Repositories::new(&db);

    let mut twin = user("u2", Role::Student);
    twin.email = "u1@example.com".into();
    repos
        .users
        .insert_many(vec![user("u1", Role::Student), twin])
        .await
        .unwrap();

    let err = indexes::apply_indexes(&db).await.unwrap_err();
    assert!(err.is_duplicate_key(), "unexpected error {:?}", err);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_popular_categories_skip_dangling_enrollments() {
    let db = fresh_db().await;
    let repos = Repositories::new(&db);

    repos
        .courses
        .insert_many(vec![
            course("c1", "u1", "Design", 10.0),
            course("c2", "u1", "Database", 10.0),
        ])
        .await
        .unwrap();
    repos
        .enrollments
        .insert_many(vec![
            enrollment("e1", "s1", "c2"),
            enrollment("e2", "s2", "c2"),
            enrollment("e3", "s3", "c1"),
            enrollment("e4", "s4", "missing"),
        ])
        .await
        .unwrap();

    let popular = Analytics::new(&db).popular_categories().await.unwrap();
    let ranked: Vec<(&str, i64)> = popular
        .iter()
        .map(|p| (p.category.as_str(), p.total))
        .collect();
    assert_eq!(ranked, vec![("Database", 2), ("Design", 1)]);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_accessors_round_trip() {
    let db = fresh_db().await;
    let repos = Repositories::new(&db);

    repos.users.add_user(user("u1", Role::Instructor)).await.unwrap();
    repos.users.add_student_user(user("u2", Role::Student)).await.unwrap();
    let rejected = repos.users.add_student_user(user("u3", Role::Instructor)).await;
    assert!(matches!(rejected, Err(EduHubError::InvalidInput(_))));

    repos
        .courses
        .create_course(course("c1", "u1", "Programming", 75.0).with_tags(vec!["Cloud".into()]))
        .await
        .unwrap();

    // Profile update and soft delete
    let update = ProfileUpdate {
        bio: Some("Loves Rust".into()),
        ..Default::default()
    };
    assert!(repos.users.update_user_profile("u2", &update).await.unwrap());
    assert_eq!(repos.users.get_active_students().await.unwrap().len(), 1);
    assert!(repos.users.soft_delete_user("u2").await.unwrap());
    assert!(repos.users.get_active_students().await.unwrap().is_empty());
    assert_eq!(repos.users.get("u2").await.unwrap().unwrap().profile.bio, "Loves Rust");

    // Join and set semantics on tags
    let joined = repos.courses.get_course_with_instructor("c1").await.unwrap().unwrap();
    assert_eq!(joined.instructor.unwrap().user_id, "u1");
    assert!(repos
        .courses
        .add_tags_to_course("c1", &["Cloud".into(), "Python".into()])
        .await
        .unwrap());
    assert_eq!(repos.courses.get("c1").await.unwrap().unwrap().tags, vec!["Cloud", "Python"]);
    assert_eq!(repos.courses.search_courses_by_title("course C1").await.unwrap().len(), 1);
    assert_eq!(repos.courses.find_courses_in_price_range(50.0, 200.0).await.unwrap().len(), 1);
    assert!(repos.courses.mark_course_published("c1").await.unwrap());
    assert!(!repos.courses.mark_course_published("c404").await.unwrap());

    // Enrollments and grading
    repos
        .enrollments
        .enroll_student(enrollment("e1", "u2", "c1").with_progress(40.0))
        .await
        .unwrap();
    let in_course = repos.enrollments.get_students_in_course("c1").await.unwrap();
    assert_eq!(in_course[0].student.as_ref().unwrap().user_id, "u2");
    assert!(repos.enrollments.delete_enrollment("e1").await.unwrap());
    assert!(!repos.enrollments.delete_enrollment("e1").await.unwrap());

    repos.submissions.submit(SubmissionDoc::new("s1", "a1", "u2")).await.unwrap();
    assert!(repos.submissions.update_assignment_grade("s1", 88.0).await.unwrap());
    let bad = repos.submissions.update_assignment_grade("s1", 101.0).await;
    assert!(matches!(bad, Err(EduHubError::InvalidInput(_))));

    let now = Utc::now();
    repos
        .assignments
        .create_assignment(AssignmentDoc {
            mongo_id: None,
            assignment_id: "a1".into(),
            course_id: "c1".into(),
            title: "Week one".into(),
            description: String::new(),
            due_date: DateTime::from_chrono(now + chrono::Duration::days(3)),
        })
        .await
        .unwrap();
    let due = repos
        .assignments
        .assignments_due_next_week(DateTime::from_chrono(now))
        .await
        .unwrap();
    assert_eq!(due.len(), 1);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_seeded_dataset_reports_and_explain() {
    let db = fresh_db().await;

    let data = SampleData::generate(&mut StdRng::seed_from_u64(42), Utc::now());
    let summary = data.insert_all(&db).await.unwrap();
    assert_eq!(summary.users, 25);
    indexes::apply_indexes(&db).await.unwrap();

    let analytics = Analytics::new(&db);
    assert_eq!(analytics.enrollments_per_course().await.unwrap().len(), 8);
    assert_eq!(
        analytics.completion_rate_per_course().await.unwrap(),
        analytics.engagement_per_course().await.unwrap()
    );
    let trend = analytics.monthly_enrollment_trend().await.unwrap();
    assert!(trend.windows(2).all(|w| w[0].period < w[1].period));

    let plan = instrumentation::explain_and_time(&db, || {
        eduhub::repository::UserRepository::active_students_query()
    })
    .await
    .unwrap();
    assert!(instrumentation::winning_stage(&plan).is_some());

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_courses_per_category_counts() {
    let db = fresh_db().await;
    let repos = Repositories::new(&db);

    repos
        .courses
        .insert_many(vec![
            course("c1", "u1", "Design", 10.0),
            course("c2", "u2", "Design", 20.0),
            course("c3", "u1", "Database", 30.0),
        ])
        .await
        .unwrap();

    let counts = Analytics::new(&db).courses_per_category().await.unwrap();
    let summary: Vec<(&str, i64)> = counts
        .iter()
        .map(|c| (c.category.as_str(), c.total_courses))
        .collect();
    assert_eq!(summary, vec![("Database", 1), ("Design", 2)]);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_average_grade_per_student_values() {
    let db = fresh_db().await;
    let repos = Repositories::new(&db);

    repos
        .submissions
        .insert_many(vec![
            graded("s1", "u1", 80.0),
            graded("s2", "u1", 90.0),
            // Ungraded, must not pull the average down
            SubmissionDoc::new("s3", "a001", "u1"),
            graded("s4", "u2", 55.5),
            SubmissionDoc::new("s5", "a001", "u3"),
        ])
        .await
        .unwrap();

    let grades = Analytics::new(&db).average_grade_per_student().await.unwrap();
    let summary: Vec<(&str, f64)> = grades
        .iter()
        .map(|g| (g.student_id.as_str(), g.average_grade))
        .collect();
    assert_eq!(summary, vec![("u1", 85.0), ("u2", 55.5)]);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_average_progress_per_course_values() {
    let db = fresh_db().await;
    let repos = Repositories::new(&db);

    repos
        .enrollments
        .insert_many(vec![
            enrollment("e1", "s1", "c1").with_progress(20.0),
            enrollment("e2", "s2", "c1").with_progress(60.0),
            enrollment("e3", "s1", "c2").with_progress(100.0),
        ])
        .await
        .unwrap();

    let analytics = Analytics::new(&db);
    let completion = analytics.completion_rate_per_course().await.unwrap();
    let summary: Vec<(&str, f64)> = completion
        .iter()
        .map(|p| (p.course_id.as_str(), p.avg_progress))
        .collect();
    assert_eq!(summary, vec![("c1", 40.0), ("c2", 100.0)]);
    assert_eq!(analytics.engagement_per_course().await.unwrap(), completion);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_reports_skip_documents_missing_group_key() {
    let db = fresh_db().await;
    let repos = Repositories::new(&db);

    repos
        .courses
        .create_course(course("c1", "u1", "Design", 40.0).with_rating(5.0))
        .await
        .unwrap();
    // Hand-written documents lacking the grouped fields
    db.collection::<bson::Document>("courses")
        .inner()
        .insert_many(vec![
            bson::doc! { "courseId": "c2", "title": "No category", "instructorId": "u1", "price": 10.0 },
            bson::doc! { "courseId": "c3", "title": "No instructor", "category": "Design", "rating": 3.0 },
        ])
        .await
        .unwrap();
    repos
        .enrollments
        .insert_many(vec![
            enrollment("e1", "s1", "c1"),
            enrollment("e2", "s2", "c2"),
        ])
        .await
        .unwrap();

    let analytics = Analytics::new(&db);

    let categories = analytics.courses_per_category().await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].category, "Design");
    assert_eq!(categories[0].total_courses, 2);

    let popular = analytics.popular_categories().await.unwrap();
    let ranked: Vec<(&str, i64)> = popular
        .iter()
        .map(|p| (p.category.as_str(), p.total))
        .collect();
    assert_eq!(ranked, vec![("Design", 1)]);

    let ratings = analytics.average_rating_per_instructor().await.unwrap();
    assert_eq!(ratings.len(), 1);
    assert_eq!(ratings[0].instructor_id, "u1");
    assert_eq!(ratings[0].average_rating, 5.0);

    let revenue = analytics.revenue_per_instructor().await.unwrap();
    assert_eq!(revenue.len(), 1);
    assert_eq!(revenue[0].total_revenue, 50.0);

    db.drop_database().await.unwrap();
}
