//! Unified error types for `StaffingBuddy`.
//!
//! Store-backed operations and bot commands return [`Result`]. The scheduling engine in
//! [`crate::core::availability`], [`crate::core::status`] and the metric helpers never fail:
//! malformed input (an end date before its start date, an unparsable date) is rejected
//! here, at the boundary, before it reaches them.

use chrono::NaiveDate;
use thiserror::Error;

/// All errors that can occur in the application.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong
        message: String,
    },

    /// A date range whose end precedes its start
    #[error("Invalid date range: {end} is before {start}")]
    InvalidDateRange {
        /// First day of the rejected range
        start: NaiveDate,
        /// Last day of the rejected range
        end: NaiveDate,
    },

    /// User supplied a value that failed validation
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of the rejected value
        message: String,
    },

    /// No employee matched the given identifier
    #[error("Employee '{name}' not found")]
    EmployeeNotFound {
        /// Name or id that was looked up
        name: String,
    },

    /// No engagement matched the given identifier
    #[error("Engagement '{name}' not found")]
    EngagementNotFound {
        /// Name or id that was looked up
        name: String,
    },

    /// No client matched the given identifier
    #[error("Client '{name}' not found")]
    ClientNotFound {
        /// Name or id that was looked up
        name: String,
    },

    /// No service matched the given identifier
    #[error("Service '{name}' not found")]
    ServiceNotFound {
        /// Name or id that was looked up
        name: String,
    },

    /// No leave with the given id
    #[error("Leave {id} not found")]
    LeaveNotFound {
        /// Leave id that was looked up
        id: i64,
    },

    /// No vulnerability with the given id
    #[error("Vulnerability {id} not found")]
    VulnerabilityNotFound {
        /// Vulnerability id that was looked up
        id: i64,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Date could not be parsed
    #[error("Date parse error: {0}")]
    DateParse(#[from] chrono::ParseError),

    /// Formatting a response failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
