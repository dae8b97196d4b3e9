//! Error types for the core value model.
//!
//! These errors are raised when a value type would be constructed in a state
//! that breaks its invariants. They are programming errors at the call site,
//! never part of normal resolution flow.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// The error type for core value construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A concrete value set was built from an empty collection.
    #[error("Empty value set for property '{property}'")]
    EmptyValueSet {
        /// The property that received no values.
        property: String,
    },

    /// A descriptor was built with a non-optional property that is not a
    /// single concrete value.
    #[error("Property '{property}' of '{value_name}' is not concrete: {found}")]
    NonConcreteProperty {
        /// Name of the value being described.
        value_name: String,
        /// The offending property.
        property: String,
        /// Display form of what was found instead.
        found: String,
    },

    /// A currency code could not be parsed.
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// A target reference string could not be parsed.
    #[error("Invalid target reference: {0}")]
    InvalidTarget(String),
}

impl CoreError {
    /// Creates an empty value set error.
    #[must_use]
    pub fn empty_value_set(property: impl Into<String>) -> Self {
        Self::EmptyValueSet {
            property: property.into(),
        }
    }
}
