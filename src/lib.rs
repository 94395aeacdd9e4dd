//! EduHub - data layer for an online learning platform
//!
//! Seeds a MongoDB database with synthetic users, courses, enrollments,
//! lessons, assignments and submissions, and offers thin accessors plus a
//! fixed set of analytics pipelines over them.
//!
//! ## Modules
//!
//! - **db**: MongoDB client, typed collections and document schemas
//! - **repository**: per-entity create/read/update/delete accessors
//! - **analytics**: aggregation reports (counts, averages, trends, rankings)
//! - **indexes**: declared index set, applied idempotently
//! - **instrumentation**: query timing and `explain` plans
//! - **seed**: deterministic sample data generation
//!
//! The database handle is always passed explicitly:
//!
//! ```no_run
//! # async fn demo() -> eduhub::Result<()> {
//! let db = eduhub::db::MongoClient::new("mongodb://localhost:27017", "eduhub_db").await?;
//! let _revenue = eduhub::analytics::Analytics::new(&db).revenue_per_instructor().await?;
//! # Ok(())
//! # }
//! ```

pub mod analytics;
pub mod config;
pub mod db;
pub mod indexes;
pub mod instrumentation;
pub mod logging;
pub mod repository;
pub mod seed;
pub mod types;

pub use config::Args;
pub use types::{EduHubError, Result};
