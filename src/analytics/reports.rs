//! Report catalogue and result rows

use bson::Document;
use serde::{Deserialize, Serialize};

use crate::analytics::pipelines;
use crate::db::schemas::{COURSE_COLLECTION, ENROLLMENT_COLLECTION, SUBMISSION_COLLECTION};
use crate::db::PlannedQuery;

/// Every analytics report the engine can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Report {
    EnrollmentsPerCourse,
    AverageRatingPerCourse,
    CoursesPerCategory,
    AverageGradePerStudent,
    CompletionRate,
    TopStudents,
    StudentsPerInstructor,
    AverageRatingPerInstructor,
    RevenuePerInstructor,
    MonthlyEnrollmentTrend,
    PopularCategories,
    Engagement,
}

impl Report {
    pub const ALL: [Report; 12] = [
        Report::EnrollmentsPerCourse,
        Report::AverageRatingPerCourse,
        Report::CoursesPerCategory,
        Report::AverageGradePerStudent,
        Report::CompletionRate,
        Report::TopStudents,
        Report::StudentsPerInstructor,
        Report::AverageRatingPerInstructor,
        Report::RevenuePerInstructor,
        Report::MonthlyEnrollmentTrend,
        Report::PopularCategories,
        Report::Engagement,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Report::EnrollmentsPerCourse => "enrollments-per-course",
            Report::AverageRatingPerCourse => "average-rating-per-course",
            Report::CoursesPerCategory => "courses-per-category",
            Report::AverageGradePerStudent => "average-grade-per-student",
            Report::CompletionRate => "completion-rate",
            Report::TopStudents => "top-students",
            Report::StudentsPerInstructor => "students-per-instructor",
            Report::AverageRatingPerInstructor => "average-rating-per-instructor",
            Report::RevenuePerInstructor => "revenue-per-instructor",
            Report::MonthlyEnrollmentTrend => "monthly-enrollment-trend",
            Report::PopularCategories => "popular-categories",
            Report::Engagement => "engagement",
        }
    }

    /// Collection the pipeline starts from
    pub fn collection(&self) -> &'static str {
        match self {
            Report::EnrollmentsPerCourse
            | Report::AverageRatingPerCourse
            | Report::CoursesPerCategory
            | Report::StudentsPerInstructor
            | Report::AverageRatingPerInstructor
            | Report::RevenuePerInstructor => COURSE_COLLECTION,
            Report::AverageGradePerStudent | Report::TopStudents => SUBMISSION_COLLECTION,
            Report::CompletionRate
            | Report::Engagement
            | Report::MonthlyEnrollmentTrend
            | Report::PopularCategories => ENROLLMENT_COLLECTION,
        }
    }

    pub fn pipeline(&self) -> Vec<Document> {
        match self {
            Report::EnrollmentsPerCourse => pipelines::enrollments_per_course(),
            Report::AverageRatingPerCourse => pipelines::average_rating_per_course(),
            Report::CoursesPerCategory => pipelines::courses_per_category(),
            Report::AverageGradePerStudent => pipelines::average_grade_per_student(),
            Report::CompletionRate | Report::Engagement => pipelines::average_progress_per_course(),
            Report::TopStudents => pipelines::top_students(),
            Report::StudentsPerInstructor => pipelines::students_per_instructor(),
            Report::AverageRatingPerInstructor => pipelines::average_rating_per_instructor(),
            Report::RevenuePerInstructor => pipelines::revenue_per_instructor(),
            Report::MonthlyEnrollmentTrend => pipelines::monthly_enrollment_trend(),
            Report::PopularCategories => pipelines::popular_categories(),
        }
    }

    pub fn query(&self) -> PlannedQuery {
        PlannedQuery::aggregate(self.collection(), self.pipeline())
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseEnrollmentCount {
    pub course_id: String,
    #[serde(default)]
    pub title: String,
    pub total_enrollments: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRating {
    #[serde(rename = "_id")]
    pub course_id: String,
    pub avg_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    #[serde(rename = "_id")]
    pub category: String,
    pub total_courses: i64,
}

/// Mean grade of one student; also the row type of the top students report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentGrade {
    #[serde(rename = "_id")]
    pub student_id: String,
    pub average_grade: f64,
}

/// Mean enrollment progress in one course, 0-100
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    #[serde(rename = "_id")]
    pub course_id: String,
    pub avg_progress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorStudents {
    #[serde(rename = "_id")]
    pub instructor_id: String,
    pub total_students: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorRating {
    #[serde(rename = "_id")]
    pub instructor_id: String,
    pub average_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorRevenue {
    #[serde(rename = "_id")]
    pub instructor_id: String,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyEnrollments {
    /// `YYYY-MM`
    #[serde(rename = "_id")]
    pub period: String,
    pub total_enrollments: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPopularity {
    #[serde(rename = "_id")]
    pub category: String,
    pub total: i64,
}
