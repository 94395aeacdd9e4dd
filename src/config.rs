//! Configuration for EduHub
//!
//! CLI arguments and environment variable handling using clap.

use clap::{Parser, Subcommand};

use crate::analytics::Report;
use crate::logging::LogFormat;
use crate::types::EduHubError;

/// EduHub - sample data, CRUD and analytics for the learning platform
#[derive(Parser, Debug, Clone)]
#[command(name = "eduhub")]
#[command(about = "Seed, index and report on the EduHub MongoDB database")]
pub struct Args {
    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "eduhub_db")]
    pub mongodb_db: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value = "pretty")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate and insert the sample dataset
    Seed {
        /// Random seed; the same seed always produces the same data
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Drop the EduHub collections before inserting
        #[arg(long, default_value = "false")]
        drop: bool,
    },

    /// Create the declared indexes
    Indexes,

    /// Run one analytics report and print its rows as JSON
    Report {
        #[arg(value_enum)]
        report: Report,
    },

    /// Time a report and print its execution plan
    Explain {
        #[arg(value_enum)]
        report: Report,
    },
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Args {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), EduHubError> {
        if self.mongodb_uri.trim().is_empty() {
            return Err(EduHubError::Config("MONGODB_URI must not be empty".into()));
        }

        if !self.mongodb_uri.starts_with("mongodb://") && !self.mongodb_uri.starts_with("mongodb+srv://") {
            return Err(EduHubError::Config(format!(
                "MONGODB_URI must start with mongodb:// or mongodb+srv://, got '{}'",
                self.mongodb_uri
            )));
        }

        if self.mongodb_db.trim().is_empty() {
            return Err(EduHubError::Config("MONGODB_DB must not be empty".into()));
        }

        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(EduHubError::Config(format!(
                "LOG_LEVEL must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.log_level
            )));
        }

        Ok(())
    }
}
