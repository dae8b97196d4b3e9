//! Engine error types.
//!
//! Only hard failures live here. A function that simply cannot serve a
//! query says so through [`Requirements::CannotContribute`], and a query no
//! function can serve ends as [`Resolution::Unsatisfiable`]; neither is an
//! error.
//!
//! [`Requirements::CannotContribute`]: crate::function::Requirements::CannotContribute
//! [`Resolution::Unsatisfiable`]: crate::resolver::Resolution::Unsatisfiable

use thiserror::Error;

use bondval_config::ConfigError;
use bondval_core::CoreError;
use bondval_traits::TraitError;

/// A specialized Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine error type.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An upstream value was promised at planning time but could not be
    /// fetched or bound.
    #[error("missing upstream value: {0}")]
    MissingUpstreamValue(String),

    /// A variant the function was not built for reached it.
    #[error("unsupported variant: {0}")]
    UnsupportedVariant(String),

    /// A published descriptor would break its invariants.
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(#[from] CoreError),

    /// The pricing library failed.
    #[error("pricing error: {0}")]
    Pricing(String),

    /// The market data provider failed.
    #[error("market data error: {0}")]
    MarketData(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl EngineError {
    /// Creates a missing upstream value error.
    pub fn missing(what: impl std::fmt::Display) -> Self {
        EngineError::MissingUpstreamValue(what.to_string())
    }

    /// Creates an unsupported variant error.
    pub fn unsupported(what: impl Into<String>) -> Self {
        EngineError::UnsupportedVariant(what.into())
    }
}

impl From<TraitError> for EngineError {
    fn from(e: TraitError) -> Self {
        match e {
            TraitError::UnsupportedCalculator(_) | TraitError::PricingFailed(_) => {
                EngineError::Pricing(e.to_string())
            }
            _ => EngineError::MarketData(e.to_string()),
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(e: ConfigError) -> Self {
        EngineError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_error_mapping() {
        let e: EngineError = TraitError::PricingFailed("no root".into()).into();
        assert!(matches!(e, EngineError::Pricing(_)));

        let e: EngineError = TraitError::NotFound("curve".into()).into();
        assert!(matches!(e, EngineError::MarketData(_)));
    }

    #[test]
    fn test_core_error_is_invalid_descriptor() {
        let e: EngineError = CoreError::empty_value_set("Curve").into();
        assert!(e.to_string().starts_with("invalid descriptor"));
    }
}
