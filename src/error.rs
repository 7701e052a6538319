//! Error types for meterlog.
//!
//! This module provides comprehensive error handling following the thiserror
//! pattern. Error types are designed to be informative, actionable, and
//! suitable for both programmatic handling and user-facing display.

use chrono::NaiveDate;
use thiserror::Error;

/// Primary error type for meterlog operations.
#[derive(Error, Debug)]
pub enum MeterError {
    /// Invoice date range is empty or inverted.
    #[error("Invalid date range: start {start} must lie before end {end}")]
    InvalidDateRange {
        /// Requested range start.
        start: NaiveDate,
        /// Requested range end.
        end: NaiveDate,
    },

    /// A simplified section tree violated its structural invariants.
    ///
    /// This indicates a bug in the tree builder, not a user error.
    #[error("Invalid section tree structure: {reason}")]
    InvalidTreeStructure {
        /// Description of the violated invariant.
        reason: String,
    },

    /// A person record failed validation.
    #[error("Invalid person '{name}': {reason}")]
    InvalidPerson {
        /// Name of the offending person record.
        name: String,
        /// Reason why the record is invalid.
        reason: String,
    },

    /// Database operation failed.
    #[error("Store error: {context}")]
    Store {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying rusqlite error.
        #[source]
        source: rusqlite::Error,
    },

    /// A date string could not be parsed.
    #[error("Invalid date '{value}' (expected YYYY-MM-DD)")]
    InvalidDate {
        /// The unparseable date string.
        value: String,
        /// Underlying chrono error.
        #[source]
        source: chrono::ParseError,
    },

    /// I/O error.
    #[error("I/O error: {context}")]
    Io {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Human-readable error message.
        message: String,
    },

    /// Invalid command-line argument.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Name of the invalid argument.
        name: String,
        /// Reason why the argument is invalid.
        reason: String,
    },

    /// Serialization error.
    #[error("Serialization error: {context}")]
    Serialization {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying serde_json error.
        #[source]
        source: serde_json::Error,
    },
}

impl MeterError {
    /// Create a new store error with context.
    #[must_use]
    pub fn store(context: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::Store {
            context: context.into(),
            source,
        }
    }

    /// Create a new I/O error with context.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a new tree-structure error.
    #[must_use]
    pub fn tree(reason: impl Into<String>) -> Self {
        Self::InvalidTreeStructure {
            reason: reason.into(),
        }
    }

    /// Get the process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidDateRange { .. } | Self::InvalidArgument { .. } => {
                exit_codes::EXIT_USAGE_ERROR
            }
            Self::InvalidDate { .. } | Self::InvalidPerson { .. } => exit_codes::EXIT_DATA_ERROR,
            Self::Store { .. } => exit_codes::EXIT_STORE_ERROR,
            Self::InvalidConfig { .. } => exit_codes::EXIT_CONFIG_ERROR,
            Self::Io { .. } => exit_codes::EXIT_IO_ERROR,
            _ => exit_codes::EXIT_GENERAL_ERROR,
        }
    }
}

/// Result type alias for meterlog operations.
pub type Result<T> = std::result::Result<T, MeterError>;

impl From<std::io::Error> for MeterError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            context: "I/O operation failed".to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for MeterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            context: "JSON operation failed".to_string(),
            source: err,
        }
    }
}

/// Exit codes for CLI operations.
pub mod exit_codes {
    /// Operation completed successfully.
    pub const EXIT_SUCCESS: i32 = 0;
    /// General/unspecified error.
    pub const EXIT_GENERAL_ERROR: i32 = 1;
    /// Database operation failed.
    pub const EXIT_STORE_ERROR: i32 = 2;
    /// Invalid configuration.
    pub const EXIT_CONFIG_ERROR: i32 = 5;
    /// Invalid command-line usage (BSD standard).
    pub const EXIT_USAGE_ERROR: i32 = 64;
    /// Input data format error (BSD standard).
    pub const EXIT_DATA_ERROR: i32 = 65;
    /// I/O error (BSD standard).
    pub const EXIT_IO_ERROR: i32 = 74;
}
