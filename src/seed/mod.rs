//! Sample data generation
//!
//! Builds a small, referentially consistent EduHub dataset from an injected
//! random source and a fixed "now", so the same seed always yields the same
//! records.

pub mod text;

use bson::DateTime;
use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::db::schemas::{
    AssignmentDoc, CourseDoc, EnrollmentDoc, Level, LessonDoc, Profile, Role, SubmissionDoc,
    UserDoc, ALL_COLLECTIONS,
};
use crate::db::MongoClient;
use crate::repository::Repositories;
use crate::types::{EduHubError, Result};

use self::text::{paragraph, round_to, sample, sentence};

/// How many records of each kind to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSizes {
    pub users: usize,
    pub courses: usize,
    pub enrollments: usize,
    pub lessons: usize,
    pub assignments: usize,
    pub submissions: usize,
}

impl Default for SampleSizes {
    fn default() -> Self {
        Self {
            users: 25,
            courses: 8,
            enrollments: 15,
            lessons: 25,
            assignments: 10,
            submissions: 12,
        }
    }
}

impl SampleSizes {
    fn validate(&self) -> Result<()> {
        if self.users < 2 {
            return Err(EduHubError::InvalidInput(
                "need at least two users to have both an instructor and a student".into(),
            ));
        }
        if self.courses == 0 && (self.enrollments + self.lessons + self.assignments) > 0 {
            return Err(EduHubError::InvalidInput(
                "enrollments, lessons and assignments need at least one course".into(),
            ));
        }
        if self.assignments == 0 && self.submissions > 0 {
            return Err(EduHubError::InvalidInput(
                "submissions need at least one assignment".into(),
            ));
        }
        Ok(())
    }
}

/// Records written by [`SampleData::insert_all`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub users: usize,
    pub courses: usize,
    pub enrollments: usize,
    pub lessons: usize,
    pub assignments: usize,
    pub submissions: usize,
}

/// A generated dataset, not yet persisted
#[derive(Debug, Clone)]
pub struct SampleData {
    pub users: Vec<UserDoc>,
    pub courses: Vec<CourseDoc>,
    pub enrollments: Vec<EnrollmentDoc>,
    pub lessons: Vec<LessonDoc>,
    pub assignments: Vec<AssignmentDoc>,
    pub submissions: Vec<SubmissionDoc>,
}

fn days_from(now: chrono::DateTime<Utc>, days: i64) -> DateTime {
    DateTime::from_chrono(now + Duration::days(days))
}

/// A random instant within the `days` before `now`
fn within_past<R: Rng + ?Sized>(rng: &mut R, now: chrono::DateTime<Utc>, days: i64) -> DateTime {
    let seconds = rng.gen_range(0..=days * 24 * 60 * 60);
    DateTime::from_chrono(now - Duration::seconds(seconds))
}

impl SampleData {
    /// Generate the default-sized dataset
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, now: chrono::DateTime<Utc>) -> Self {
        let sizes = SampleSizes::default();
        Self::build(rng, now, &sizes)
    }

    /// Generate a dataset of custom size
    pub fn generate_with<R: Rng + ?Sized>(
        rng: &mut R,
        now: chrono::DateTime<Utc>,
        sizes: &SampleSizes,
    ) -> Result<Self> {
        sizes.validate()?;
        Ok(Self::build(rng, now, sizes))
    }

    fn build<R: Rng + ?Sized>(rng: &mut R, now: chrono::DateTime<Utc>, sizes: &SampleSizes) -> Self {
        let users = generate_users(rng, now, sizes.users);

        let instructors: Vec<&UserDoc> = users.iter().filter(|u| u.role == Role::Instructor).collect();
        let students: Vec<&UserDoc> = users.iter().filter(|u| u.role == Role::Student).collect();

        let courses: Vec<CourseDoc> = (0..sizes.courses)
            .filter_map(|i| {
                let instructor = instructors.choose(rng)?;
                Some(generate_course(rng, now, i, &instructor.user_id))
            })
            .collect();

        let enrollments: Vec<EnrollmentDoc> = (0..sizes.enrollments)
            .filter_map(|i| {
                let student = students.choose(rng)?;
                let course = courses.choose(rng)?;
                let enrolled_at = within_past(rng, now, 365);
                Some(EnrollmentDoc {
                    mongo_id: None,
                    enrollment_id: format!("e{:03}", i + 1),
                    student_id: student.user_id.clone(),
                    course_id: course.course_id.clone(),
                    enrolled_at,
                    progress: round_to(rng.gen_range(0.0..=100.0), 2),
                    completed: rng.gen_bool(0.5),
                })
            })
            .collect();

        let lessons: Vec<LessonDoc> = (0..sizes.lessons)
            .filter_map(|i| {
                let course = courses.choose(rng)?;
                Some(LessonDoc {
                    mongo_id: None,
                    lesson_id: format!("l{:03}", i + 1),
                    course_id: course.course_id.clone(),
                    title: sentence(rng, 5),
                    content: paragraph(rng, 3),
                    video_url: format!("https://videos.example.com/l{:03}.mp4", i + 1),
                    duration: round_to(rng.gen_range(5.0..=30.0), 2),
                    order: rng.gen_range(1..=10),
                })
            })
            .collect();

        let assignments: Vec<AssignmentDoc> = (0..sizes.assignments)
            .filter_map(|i| {
                let course = courses.choose(rng)?;
                let due_in = rng.gen_range(5..=20);
                Some(AssignmentDoc {
                    mongo_id: None,
                    assignment_id: format!("a{:03}", i + 1),
                    course_id: course.course_id.clone(),
                    title: sentence(rng, 6),
                    description: paragraph(rng, 2),
                    due_date: days_from(now, due_in),
                })
            })
            .collect();

        let submissions: Vec<SubmissionDoc> = (0..sizes.submissions)
            .filter_map(|i| {
                let assignment = assignments.choose(rng)?;
                let student = students.choose(rng)?;
                let days_ago = rng.gen_range(0..=10);
                Some(SubmissionDoc {
                    mongo_id: None,
                    submission_id: format!("s{:03}", i + 1),
                    assignment_id: assignment.assignment_id.clone(),
                    student_id: student.user_id.clone(),
                    submitted_at: days_from(now, -days_ago),
                    content: paragraph(rng, 4),
                    grade: Some(round_to(rng.gen_range(0.0..=100.0), 2)),
                })
            })
            .collect();

        Self {
            users,
            courses,
            enrollments,
            lessons,
            assignments,
            submissions,
        }
    }

    /// Write every collection, users first
    pub async fn insert_all(self, db: &MongoClient) -> Result<SeedSummary> {
        let repos = Repositories::new(db);

        let summary = SeedSummary {
            users: repos.users.insert_many(self.users).await?,
            courses: repos.courses.insert_many(self.courses).await?,
            enrollments: repos.enrollments.insert_many(self.enrollments).await?,
            lessons: repos.lessons.insert_many(self.lessons).await?,
            assignments: repos.assignments.insert_many(self.assignments).await?,
            submissions: repos.submissions.insert_many(self.submissions).await?,
        };

        info!(
            "Seeded {} users, {} courses, {} enrollments, {} lessons, {} assignments, {} submissions",
            summary.users,
            summary.courses,
            summary.enrollments,
            summary.lessons,
            summary.assignments,
            summary.submissions
        );
        Ok(summary)
    }
}

fn generate_users<R: Rng + ?Sized>(
    rng: &mut R,
    now: chrono::DateTime<Utc>,
    count: usize,
) -> Vec<UserDoc> {
    let mut users: Vec<UserDoc> = (0..count)
        .map(|i| {
            let first = *text::FIRST_NAMES.choose(rng).unwrap_or(&"Alex");
            let last = *text::LAST_NAMES.choose(rng).unwrap_or(&"Smith");
            let role = if rng.gen_bool(0.5) {
                Role::Student
            } else {
                Role::Instructor
            };
            let skill_count = rng.gen_range(1..=4);

            UserDoc {
                mongo_id: None,
                user_id: format!("u{:03}", i + 1),
                // The index suffix keeps emails unique however names repeat
                email: format!("{}.{}{}@example.com", first, last, i + 1).to_lowercase(),
                first_name: first.to_string(),
                last_name: last.to_string(),
                role,
                date_joined: within_past(rng, now, 730),
                profile: Profile {
                    bio: sentence(rng, 8),
                    avatar: format!("https://avatars.example.com/u{:03}.png", i + 1),
                    skills: sample(rng, text::SKILLS, skill_count),
                },
                is_active: true,
            }
        })
        .collect();

    ensure_role(rng, &mut users, Role::Instructor, Role::Student);
    ensure_role(rng, &mut users, Role::Student, Role::Instructor);
    users
}

/// Make sure at least one user holds `wanted`, converting a user of
/// `donor` role when none does
fn ensure_role<R: Rng + ?Sized>(rng: &mut R, users: &mut [UserDoc], wanted: Role, donor: Role) {
    if users.len() < 2 || users.iter().any(|u| u.role == wanted) {
        return;
    }
    let donors: Vec<usize> = users
        .iter()
        .enumerate()
        .filter(|(_, u)| u.role == donor)
        .map(|(i, _)| i)
        .collect();
    if let Some(&index) = donors.choose(rng) {
        users[index].role = wanted;
    }
}

fn generate_course<R: Rng + ?Sized>(
    rng: &mut R,
    now: chrono::DateTime<Utc>,
    index: usize,
    instructor_id: &str,
) -> CourseDoc {
    let level = *[Level::Beginner, Level::Intermediate, Level::Advanced]
        .choose(rng)
        .unwrap_or(&Level::Beginner);
    let category = *text::CATEGORIES.choose(rng).unwrap_or(&"Programming");
    let created = DateTime::from_chrono(now);

    CourseDoc {
        mongo_id: None,
        course_id: format!("c{:03}", index + 1),
        title: sentence(rng, 4),
        description: paragraph(rng, 3),
        instructor_id: instructor_id.to_string(),
        category: category.to_string(),
        level,
        duration: round_to(rng.gen_range(5.0..=40.0), 1),
        price: round_to(rng.gen_range(10.0..=100.0), 2),
        tags: sample(rng, text::COURSE_TAGS, 2),
        created_at: created,
        updated_at: created,
        is_published: rng.gen_bool(0.5),
        rating: None,
    }
}

/// Drop every EduHub collection along with its indexes
pub async fn reset(db: &MongoClient) -> Result<()> {
    for name in ALL_COLLECTIONS {
        db.collection::<bson::Document>(name).drop().await?;
    }
    info!("Dropped {} collections", ALL_COLLECTIONS.len());
    Ok(())
}
