//! Error types for bridge cadence.
//!
//! Structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for automation
//! - Remediation suggestions for humans
//!
//! Short or sparse event histories are *not* errors. The engine answers
//! those with a degraded recommendation. Configuration problems are
//! `bc_config::ConfigError`; this type covers unreadable input and I/O.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for bridge cadence operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Event input that cannot be parsed.
    Input,
    /// File and stdin I/O errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for bridge cadence.
#[derive(Error, Debug)]
pub enum Error {
    // Input errors (20-29)
    #[error("invalid event input: {0}")]
    InvalidInput(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 20-29: Input errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::InvalidInput(_) => 20,
            Error::Io(_) => 60,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidInput(_) => ErrorCategory::Input,
            Error::Io(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether this error is potentially recoverable.
    pub fn is_recoverable(&self) -> bool {
        match self {
            // The same bytes will fail the same way.
            Error::InvalidInput(_) => false,
            Error::Io(_) => true,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => {
                "Events must be a JSON array of {id, open_time, close_time?} with RFC 3339 timestamps."
            }
            Error::Io(_) => "Check that the file exists and is readable, then retry.",
        }
    }
}
