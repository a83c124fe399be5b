//! Error types for the extraction pipeline

use thiserror::Error;

/// Errors that can occur during extraction
///
/// Capability failures (`Model`, `Timeout`, `InvalidFormat`, `Json`) are
/// recovered per category by falling back to pattern-only results; they never
/// abort a document. `Validation` failures are per-candidate and recovered by
/// omission.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// External model capability failed
    #[error("Model error: {0}")]
    Model(String),

    /// Model call exceeded the configured deadline
    #[error("Model call timed out")]
    Timeout,

    /// Model response carried no usable JSON
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Candidate fact failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
