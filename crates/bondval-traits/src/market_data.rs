//! Market data provider trait.
//!
//! A [`MarketDataProvider`] answers two questions for the resolver:
//! - availability: which published value would satisfy this query?
//! - retrieval: what is the value behind this published descriptor?
//!
//! Upstream values are yield curves (targeted at a currency), quoted clean
//! prices and quoted yields (targeted at a security).

use serde::{Deserialize, Serialize};

use bondval_core::{Currency, ValueDescriptor, ValueQuery};

use crate::error::{TraitError, TraitResult};

/// Source type for market data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    /// Snapshot/request-response
    Snapshot,
    /// File-based (CSV, JSON)
    File,
    /// In-process fixtures
    Manual,
}

// =============================================================================
// YIELD CURVE DATA
// =============================================================================

/// A discrete zero-rate curve as handed to the pricing library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldCurveData {
    /// Curve name (e.g. "Discounting").
    pub name: String,
    /// Curve currency.
    pub currency: Currency,
    /// Pillar times in years, strictly increasing.
    pub tenors: Vec<f64>,
    /// Continuously compounded zero rates as decimals, one per tenor.
    pub rates: Vec<f64>,
}

impl YieldCurveData {
    /// Creates a curve, checking the pillars.
    pub fn new(
        name: impl Into<String>,
        currency: Currency,
        tenors: Vec<f64>,
        rates: Vec<f64>,
    ) -> TraitResult<Self> {
        let curve = Self {
            name: name.into(),
            currency,
            tenors,
            rates,
        };
        curve.validate()?;
        Ok(curve)
    }

    /// Checks pillar count and ordering.
    pub fn validate(&self) -> TraitResult<()> {
        if self.tenors.is_empty() {
            return Err(TraitError::InvalidInput(format!(
                "curve '{}' has no pillars",
                self.name
            )));
        }
        if self.tenors.len() != self.rates.len() {
            return Err(TraitError::InvalidInput(format!(
                "curve '{}' has {} tenors but {} rates",
                self.name,
                self.tenors.len(),
                self.rates.len()
            )));
        }
        if self.tenors.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TraitError::InvalidInput(format!(
                "curve '{}' tenors are not strictly increasing",
                self.name
            )));
        }
        Ok(())
    }
}

// =============================================================================
// MARKET VALUE
// =============================================================================

/// An upstream value behind a published descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum MarketValue {
    /// A yield curve.
    Curve(YieldCurveData),
    /// A quoted clean price, in percent of par.
    Price(f64),
    /// A quoted yield to maturity, in percent.
    Yield(f64),
}

impl MarketValue {
    /// Returns the curve, if this is one.
    #[must_use]
    pub fn as_curve(&self) -> Option<&YieldCurveData> {
        match self {
            MarketValue::Curve(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the quoted price, if this is one.
    #[must_use]
    pub fn as_price(&self) -> Option<f64> {
        match self {
            MarketValue::Price(p) => Some(*p),
            _ => None,
        }
    }

    /// Returns the quoted yield, if this is one.
    #[must_use]
    pub fn as_yield(&self) -> Option<f64> {
        match self {
            MarketValue::Yield(y) => Some(*y),
            _ => None,
        }
    }
}

// =============================================================================
// PROVIDER
// =============================================================================

/// Supplier of upstream values.
///
/// `Ok(None)` means "not available"; the resolver treats it as a reason to
/// try another function. `Err` is reserved for a broken source.
pub trait MarketDataProvider: Send + Sync {
    /// Source type.
    fn source_type(&self) -> SourceType;

    /// Returns the descriptor of a value that satisfies `query`, if one
    /// exists.
    fn resolve(&self, query: &ValueQuery) -> TraitResult<Option<ValueDescriptor>>;

    /// Fetches the value behind a descriptor previously returned by
    /// [`resolve`](Self::resolve).
    fn value(&self, descriptor: &ValueDescriptor) -> TraitResult<Option<MarketValue>>;
}
