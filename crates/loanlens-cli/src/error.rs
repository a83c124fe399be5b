//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Extraction pipeline error
    #[error("Extraction error: {0}")]
    Extract(#[from] loanlens_extractor::ExtractError),

    /// Comparison error
    #[error("{0}")]
    Compare(#[from] loanlens_comparator::CompareError),

    /// Storage error
    #[error("Storage error: {0}")]
    Store(#[from] loanlens_store::StoreError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
