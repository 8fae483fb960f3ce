//! Error types for the feedmark library.

use std::path::PathBuf;
use thiserror::Error;

/// Message shown to the user whenever the feedback generator fails.
pub const FEEDBACK_UNAVAILABLE: &str = "Error: Unable to get feedback.";

/// Main error type for feedmark operations.
#[derive(Debug, Error)]
pub enum FeedmarkError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error interpreting a tabular row.
    #[error("Parse error at row {row}, column {column}: {message}")]
    Parse {
        row: usize,
        column: usize,
        message: String,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty upload or no rows to distribute over.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// An annotation pair whose original text is empty.
    #[error("Invalid annotation pair at index {index}: original text is empty")]
    InvalidPair { index: usize },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The feedback generator could not produce a response.
    #[error("Feedback generator error: {0}")]
    Generator(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl FeedmarkError {
    /// Text suitable for showing to the person who asked for feedback.
    ///
    /// Generator failures collapse into a single terminal message; every other
    /// error is shown as-is.
    pub fn user_message(&self) -> String {
        match self {
            FeedmarkError::Generator(_) => FEEDBACK_UNAVAILABLE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for feedmark operations.
pub type Result<T> = std::result::Result<T, FeedmarkError>;
