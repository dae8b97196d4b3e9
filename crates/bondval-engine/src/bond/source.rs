//! Data sources a bond function derives its figure from.

use serde::{Deserialize, Serialize};
use std::fmt;

use bondval_core::value::{calculation_methods, value_names};

/// How a curve-based function's two curve roles map onto upstream curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveLayout {
    /// One upstream curve serves both the risk-free and the credit role.
    Shared,
    /// Risk-free and credit roles are served by two different curves.
    Distinct,
}

impl CurveLayout {
    /// Stable lower-case name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CurveLayout::Shared => "shared",
            CurveLayout::Distinct => "distinct",
        }
    }

    /// Does a (risk-free, credit) request fit this layout?
    ///
    /// Curves are the same when both name and configuration agree.
    #[must_use]
    pub fn accepts(&self, risk_free: (&str, &str), credit: (&str, &str)) -> bool {
        let same = risk_free == credit;
        match self {
            CurveLayout::Shared => same,
            CurveLayout::Distinct => !same,
        }
    }
}

impl fmt::Display for CurveLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a bond function's figure comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DataSource {
    /// Discounting with yield curves.
    Curves {
        /// Curve layout.
        layout: CurveLayout,
    },
    /// A quoted clean price, optionally alongside curves (Z-spread).
    CleanPrice {
        /// Curve layout, for functions that also read curves.
        curves: Option<CurveLayout>,
    },
    /// A quoted yield to maturity.
    Yield,
}

impl DataSource {
    /// Value of the `CalculationMethod` property on published results.
    #[must_use]
    pub fn calculation_method(&self) -> &'static str {
        match self {
            DataSource::Curves { .. } => calculation_methods::FROM_CURVES,
            DataSource::CleanPrice { .. } => calculation_methods::FROM_CLEAN_PRICE,
            DataSource::Yield => calculation_methods::FROM_YIELD,
        }
    }

    /// The curve layout, if the function reads curves.
    #[must_use]
    pub fn curve_layout(&self) -> Option<CurveLayout> {
        match self {
            DataSource::Curves { layout } => Some(*layout),
            DataSource::CleanPrice { curves } => *curves,
            DataSource::Yield => None,
        }
    }

    /// The quoted market value the function reads, if any.
    #[must_use]
    pub fn quote_value_name(&self) -> Option<&'static str> {
        match self {
            DataSource::Curves { .. } => None,
            DataSource::CleanPrice { .. } => Some(value_names::MARKET_CLEAN_PRICE),
            DataSource::Yield => Some(value_names::MARKET_YTM),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.calculation_method())?;
        if let Some(layout) = self.curve_layout() {
            write!(f, " ({} curves)", layout)?;
        }
        Ok(())
    }
}
