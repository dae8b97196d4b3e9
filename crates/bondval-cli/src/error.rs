//! CLI error types.

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Malformed `NAME=VALUE` property argument.
    #[error("Invalid property '{0}'. Use NAME=VALUE, NAME=V1,V2 or NAME=*.")]
    InvalidProperty(String),

    /// Unknown currency code.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Input file produced nothing to work on.
    #[error("No bonds loaded from {0}")]
    NoBonds(String),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
