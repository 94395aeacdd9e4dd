//! MongoDB access layer
//!
//! Typed collections over a shared client, plus the document schemas for
//! every EduHub entity kind.

pub mod mongo;
pub mod query;
pub mod schemas;

pub use mongo::{IntoIndexes, MongoClient, MongoCollection};
pub use query::PlannedQuery;
