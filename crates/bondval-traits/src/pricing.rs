//! Pricing library trait.
//!
//! The engine never does bond arithmetic itself. It converts a security into
//! an opaque derivative through the [`PricingLibrary`] and then asks the
//! library to run one of the calculators named by [`CalculatorId`].

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bondval_core::types::BondSecurity;
use bondval_core::value::Payload;

use crate::error::TraitResult;
use crate::market_data::YieldCurveData;

// =============================================================================
// CALCULATOR ID
// =============================================================================

/// Which calculator the pricing library should run.
///
/// One variant per (measure, data source) pair the function catalogue uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculatorId {
    // From curves
    /// Clean price from discounting curves.
    CleanPriceFromCurves,
    /// Dirty price from discounting curves.
    DirtyPriceFromCurves,
    /// Yield to maturity from discounting curves.
    YieldFromCurves,
    /// Macaulay duration from discounting curves.
    MacaulayDurationFromCurves,
    /// Modified duration from discounting curves.
    ModifiedDurationFromCurves,
    /// Convexity from discounting curves.
    ConvexityFromCurves,
    /// PV01 from discounting curves.
    Pv01FromCurves,

    // From a quoted clean price
    /// Dirty price from a clean price (adds accrued interest).
    DirtyPriceFromCleanPrice,
    /// Yield to maturity implied by a clean price.
    YieldFromCleanPrice,
    /// Macaulay duration from a clean price.
    MacaulayDurationFromCleanPrice,
    /// Modified duration from a clean price.
    ModifiedDurationFromCleanPrice,
    /// Convexity from a clean price.
    ConvexityFromCleanPrice,
    /// Z-spread over the curves implied by a clean price.
    ZSpreadFromCleanPrice,
    /// Present value sensitivity to the Z-spread.
    PvZSpreadSensitivityFromCleanPrice,

    // From a quoted yield
    /// Clean price from a yield.
    CleanPriceFromYield,
    /// Dirty price from a yield.
    DirtyPriceFromYield,
    /// Macaulay duration from a yield.
    MacaulayDurationFromYield,
    /// Modified duration from a yield.
    ModifiedDurationFromYield,
    /// Convexity from a yield.
    ConvexityFromYield,
}

impl CalculatorId {
    /// Every calculator.
    pub const ALL: [CalculatorId; 19] = [
        CalculatorId::CleanPriceFromCurves,
        CalculatorId::DirtyPriceFromCurves,
        CalculatorId::YieldFromCurves,
        CalculatorId::MacaulayDurationFromCurves,
        CalculatorId::ModifiedDurationFromCurves,
        CalculatorId::ConvexityFromCurves,
        CalculatorId::Pv01FromCurves,
        CalculatorId::DirtyPriceFromCleanPrice,
        CalculatorId::YieldFromCleanPrice,
        CalculatorId::MacaulayDurationFromCleanPrice,
        CalculatorId::ModifiedDurationFromCleanPrice,
        CalculatorId::ConvexityFromCleanPrice,
        CalculatorId::ZSpreadFromCleanPrice,
        CalculatorId::PvZSpreadSensitivityFromCleanPrice,
        CalculatorId::CleanPriceFromYield,
        CalculatorId::DirtyPriceFromYield,
        CalculatorId::MacaulayDurationFromYield,
        CalculatorId::ModifiedDurationFromYield,
        CalculatorId::ConvexityFromYield,
    ];

    /// Stable identifier string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CalculatorId::CleanPriceFromCurves => "clean_price_from_curves",
            CalculatorId::DirtyPriceFromCurves => "dirty_price_from_curves",
            CalculatorId::YieldFromCurves => "yield_from_curves",
            CalculatorId::MacaulayDurationFromCurves => "macaulay_duration_from_curves",
            CalculatorId::ModifiedDurationFromCurves => "modified_duration_from_curves",
            CalculatorId::ConvexityFromCurves => "convexity_from_curves",
            CalculatorId::Pv01FromCurves => "pv01_from_curves",
            CalculatorId::DirtyPriceFromCleanPrice => "dirty_price_from_clean_price",
            CalculatorId::YieldFromCleanPrice => "yield_from_clean_price",
            CalculatorId::MacaulayDurationFromCleanPrice => "macaulay_duration_from_clean_price",
            CalculatorId::ModifiedDurationFromCleanPrice => "modified_duration_from_clean_price",
            CalculatorId::ConvexityFromCleanPrice => "convexity_from_clean_price",
            CalculatorId::ZSpreadFromCleanPrice => "z_spread_from_clean_price",
            CalculatorId::PvZSpreadSensitivityFromCleanPrice => {
                "pv_z_spread_sensitivity_from_clean_price"
            }
            CalculatorId::CleanPriceFromYield => "clean_price_from_yield",
            CalculatorId::DirtyPriceFromYield => "dirty_price_from_yield",
            CalculatorId::MacaulayDurationFromYield => "macaulay_duration_from_yield",
            CalculatorId::ModifiedDurationFromYield => "modified_duration_from_yield",
            CalculatorId::ConvexityFromYield => "convexity_from_yield",
        }
    }
}

impl fmt::Display for CalculatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// DERIVATIVE + MARKET DATA BUNDLE
// =============================================================================

/// A curve as the market data provider publishes it: name plus calculation
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CurveId {
    /// Curve name.
    pub name: String,
    /// Calculation configuration.
    pub config: String,
}

impl CurveId {
    /// Creates the id.
    pub fn new(name: impl Into<String>, config: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: config.into(),
        }
    }
}

impl fmt::Display for CurveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.config)
    }
}

/// Curves a derivative is built against, one per role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurveNames {
    /// Risk-free (discounting) curve.
    pub risk_free: CurveId,
    /// Credit (issuer) curve.
    pub credit: CurveId,
}

impl CurveNames {
    /// Creates the pair.
    pub fn new(risk_free: CurveId, credit: CurveId) -> Self {
        Self { risk_free, credit }
    }

    /// True when one curve serves both roles. Same name under two
    /// configurations is two curves.
    #[must_use]
    pub fn is_shared(&self) -> bool {
        self.risk_free == self.credit
    }
}

/// Opaque pricing-library representation of a bond as of a date.
pub trait BondDerivative: fmt::Debug + Send + Sync {
    /// Identifier of the security the derivative was built from.
    fn security_id(&self) -> &str;

    /// Downcast hook for the library that built it.
    fn as_any(&self) -> &dyn Any;
}

/// Market data handed to a calculator.
///
/// Quoted prices and yields are decimals here (0.985, 0.0425); the engine
/// converts from the percent quotes it receives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingMarketData {
    /// Curves keyed by name and configuration.
    pub curves: BTreeMap<CurveId, YieldCurveData>,
    /// Clean price as a fraction of par.
    pub clean_price: Option<f64>,
    /// Yield to maturity as a decimal.
    pub yield_to_maturity: Option<f64>,
}

impl PricingMarketData {
    /// Empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a curve under its own name and the given configuration.
    #[must_use]
    pub fn with_curve(mut self, config: impl Into<String>, curve: YieldCurveData) -> Self {
        self.curves.insert(CurveId::new(curve.name.clone(), config), curve);
        self
    }

    /// Sets the clean price.
    #[must_use]
    pub fn with_clean_price(mut self, price: f64) -> Self {
        self.clean_price = Some(price);
        self
    }

    /// Sets the yield.
    #[must_use]
    pub fn with_yield(mut self, ytm: f64) -> Self {
        self.yield_to_maturity = Some(ytm);
        self
    }

    /// Looks up a curve.
    #[must_use]
    pub fn curve(&self, id: &CurveId) -> Option<&YieldCurveData> {
        self.curves.get(id)
    }

    /// The curves serving each role, if both are present.
    #[must_use]
    pub fn curves_for(&self, names: &CurveNames) -> Option<(&YieldCurveData, &YieldCurveData)> {
        Some((self.curve(&names.risk_free)?, self.curve(&names.credit)?))
    }
}

// =============================================================================
// PRICING LIBRARY
// =============================================================================

/// The bond pricing mathematics.
///
/// Results are in library units: prices as fractions of par, yields and
/// spreads as decimals. The engine applies display scaling.
pub trait PricingLibrary: Send + Sync {
    /// Converts a security into a derivative as of `valuation_date`.
    ///
    /// `curves` is `None` for functions that price from a quote alone.
    fn security_to_derivative(
        &self,
        security: &BondSecurity,
        valuation_date: NaiveDate,
        curves: Option<&CurveNames>,
    ) -> TraitResult<Box<dyn BondDerivative>>;

    /// Runs a calculator against a derivative.
    fn evaluate(
        &self,
        calculator: CalculatorId,
        derivative: &dyn BondDerivative,
        market_data: &PricingMarketData,
    ) -> TraitResult<Payload>;
}
