//! Error types for collaborator operations.

use thiserror::Error;

/// A specialized Result type for collaborator operations.
pub type TraitResult<T> = Result<T, TraitError>;

/// Common error type for collaborator operations.
#[derive(Debug, Error)]
pub enum TraitError {
    /// Requested resource not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Source not available
    #[error("source not available: {0}")]
    SourceNotAvailable(String),

    /// Parse/deserialization error
    #[error("parse error: {0}")]
    ParseError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// Invalid input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The pricing library has no calculator for the request
    #[error("unsupported calculator: {0}")]
    UnsupportedCalculator(String),

    /// The pricing library failed to produce a number
    #[error("pricing failed: {0}")]
    PricingFailed(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for TraitError {
    fn from(e: std::io::Error) -> Self {
        TraitError::IoError(e.to_string())
    }
}

impl From<serde_json::Error> for TraitError {
    fn from(e: serde_json::Error) -> Self {
        TraitError::ParseError(e.to_string())
    }
}
