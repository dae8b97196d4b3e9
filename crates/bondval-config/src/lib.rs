//! Bondval Configuration Layer
//!
//! Configuration for the Bondval resolution engine.
//!
//! # Features
//!
//! - **Default Curves**: per-currency risk-free and credit curves used when a
//!   query leaves them unspecified
//! - **Resolver Settings**: valuation date, fallback behaviour, batch
//!   parallelism
//! - **Files**: TOML or JSON, chosen by extension, validated on load
//!
//! # Example
//!
//! ```rust
//! use bondval_config::{DefaultCurveConfig, Validate};
//! use bondval_core::Currency;
//!
//! let defaults = DefaultCurveConfig::standard();
//! let usd = defaults.for_currency(Currency::USD).unwrap();
//! assert_eq!(usd.risk_free_curve, "Discounting");
//! assert_eq!(usd.risk_free_config, "DefaultTwoCurveUSDConfig");
//! assert!(defaults.is_valid());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod curves;
mod error;
mod loader;
mod resolver;

// Re-export core types
pub use curves::{CurrencyCurveDefaults, CurveDefaults, DefaultCurveConfig};
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use loader::{BondvalConfig, ConfigFormat};
pub use resolver::ResolverConfig;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::curves::{CurveDefaults, DefaultCurveConfig};
    pub use crate::error::{ConfigError, ConfigResult, Validate};
    pub use crate::loader::BondvalConfig;
    pub use crate::resolver::ResolverConfig;
}
