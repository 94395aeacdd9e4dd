//! Shared error and result types

use thiserror::Error;

/// Server error code MongoDB reports for unique index violations
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// Errors surfaced by EduHub operations
#[derive(Debug, Error)]
pub enum EduHubError {
    /// Could not reach or authenticate against MongoDB
    #[error("Connection error: {0}")]
    Connection(String),

    /// A unique index rejected the write
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Any other driver or server failure
    #[error("Database error: {0}")]
    Database(String),

    /// Accessor input outside its allowed range
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// BSON encoding or decoding failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid runtime configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EduHubError {
    /// Classify a driver error, prefixing it with the failed operation
    pub fn from_driver(context: &str, err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            EduHubError::DuplicateKey(format!("{}: {}", context, err))
        } else {
            EduHubError::Database(format!("{}: {}", context, err))
        }
    }

    /// Whether this error is a unique constraint violation
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, EduHubError::DuplicateKey(_))
    }
}

impl From<bson::de::Error> for EduHubError {
    fn from(e: bson::de::Error) -> Self {
        EduHubError::Serialization(e.to_string())
    }
}

impl From<bson::ser::Error> for EduHubError {
    fn from(e: bson::ser::Error) -> Self {
        EduHubError::Serialization(e.to_string())
    }
}

/// Whether a driver error carries the duplicate key server code.
///
/// Covers single and batch writes as well as index builds that find existing
/// duplicates (reported as command errors).
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::InsertMany(insert_error) => insert_error
            .write_errors
            .as_ref()
            .is_some_and(|errors| errors.iter().any(|e| e.code == DUPLICATE_KEY_CODE)),
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

/// Result alias for EduHub operations
pub type Result<T> = std::result::Result<T, EduHubError>;
