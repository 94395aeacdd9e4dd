//! Analytics engine
//!
//! Fixed reporting queries over the EduHub collections. Each call runs one
//! aggregation pipeline server-side and recomputes from scratch; nothing is
//! cached and nothing is written.
//!
//! ```text
//! courses ──$lookup──► enrollments     per-course / per-instructor stats
//! enrollments ──$lookup──► courses     category popularity
//! submissions                          grade statistics
//! ```

pub mod pipelines;
pub mod reports;

pub use reports::{
    CategoryCount, CategoryPopularity, CourseEnrollmentCount, CourseProgress, CourseRating,
    InstructorRating, InstructorRevenue, InstructorStudents, MonthlyEnrollments, Report,
    StudentGrade,
};

use bson::Document;
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::debug;

use crate::db::MongoClient;
use crate::types::Result;

/// Runs reports against one database
#[derive(Debug, Clone)]
pub struct Analytics {
    db: MongoClient,
}

impl Analytics {
    pub fn new(db: &MongoClient) -> Self {
        Self { db: db.clone() }
    }

    /// Run a report and decode its rows
    pub async fn run<R>(&self, report: Report) -> Result<Vec<R>>
    where
        R: DeserializeOwned,
    {
        let started = Instant::now();
        let rows = self
            .db
            .collection::<Document>(report.collection())
            .aggregate::<R>(report.pipeline())
            .await?;

        debug!(
            "Report '{}' produced {} rows in {:?}",
            report,
            rows.len(),
            started.elapsed()
        );
        Ok(rows)
    }

    /// Run a report and keep the raw output documents
    pub async fn run_raw(&self, report: Report) -> Result<Vec<Document>> {
        self.run::<Document>(report).await
    }

    /// Every course with its enrollment count, zero included
    pub async fn enrollments_per_course(&self) -> Result<Vec<CourseEnrollmentCount>> {
        self.run(Report::EnrollmentsPerCourse).await
    }

    /// Rated courses only
    pub async fn average_rating_per_course(&self) -> Result<Vec<CourseRating>> {
        self.run(Report::AverageRatingPerCourse).await
    }

    pub async fn courses_per_category(&self) -> Result<Vec<CategoryCount>> {
        self.run(Report::CoursesPerCategory).await
    }

    pub async fn average_grade_per_student(&self) -> Result<Vec<StudentGrade>> {
        self.run(Report::AverageGradePerStudent).await
    }

    /// Average progress per course as a completion proxy
    pub async fn completion_rate_per_course(&self) -> Result<Vec<CourseProgress>> {
        self.run(Report::CompletionRate).await
    }

    /// Same computation as [`Analytics::completion_rate_per_course`]
    pub async fn engagement_per_course(&self) -> Result<Vec<CourseProgress>> {
        self.run(Report::Engagement).await
    }

    /// Students averaging 90 or more, best first
    pub async fn top_students(&self) -> Result<Vec<StudentGrade>> {
        self.run(Report::TopStudents).await
    }

    pub async fn students_per_instructor(&self) -> Result<Vec<InstructorStudents>> {
        self.run(Report::StudentsPerInstructor).await
    }

    pub async fn average_rating_per_instructor(&self) -> Result<Vec<InstructorRating>> {
        self.run(Report::AverageRatingPerInstructor).await
    }

    pub async fn revenue_per_instructor(&self) -> Result<Vec<InstructorRevenue>> {
        self.run(Report::RevenuePerInstructor).await
    }

    /// Oldest month first
    pub async fn monthly_enrollment_trend(&self) -> Result<Vec<MonthlyEnrollments>> {
        self.run(Report::MonthlyEnrollmentTrend).await
    }

    /// Most enrolled category first
    pub async fn popular_categories(&self) -> Result<Vec<CategoryPopularity>> {
        self.run(Report::PopularCategories).await
    }
}
