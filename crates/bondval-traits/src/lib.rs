//! # Bondval Traits
//!
//! Collaborator trait definitions for the Bondval resolution engine.
//!
//! The engine negotiates *which* values are needed; these collaborators
//! supply them and do the arithmetic:
//!
//! - [`market_data`]: availability and retrieval of upstream values (yield
//!   curves, quoted clean prices, quoted yields)
//! - [`pricing`]: security-to-derivative conversion and calculator evaluation
//!
//! Implementations live in extension crates or in the caller.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod market_data;
pub mod pricing;

// Re-export commonly used types
pub use error::{TraitError, TraitResult};
pub use market_data::{MarketDataProvider, MarketValue, SourceType, YieldCurveData};
pub use pricing::{
    BondDerivative, CalculatorId, CurveId, CurveNames, PricingLibrary, PricingMarketData,
};
