//! Error types for unhallu library.
//!
//! Cleaning itself never fails. Errors only come from building a cleaner
//! or loading options from outside the process.

use std::io;
use thiserror::Error;

/// Result type alias for unhallu operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for unhallu library.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while reading an options file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Options file is not valid JSON or has the wrong shape.
    #[error("Invalid options: {0}")]
    Json(#[from] serde_json::Error),

    /// The language name is not one of the supported tags.
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    /// A stopword phrase could not be compiled into a matcher.
    #[error("Invalid stopword {phrase:?}: {message}")]
    InvalidStopword { phrase: String, message: String },
}
