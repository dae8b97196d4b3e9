//! Display scaling of calculator output.
//!
//! Calculators return library units (fractions of par, decimal yields and
//! spreads). Published values are in market units.

use serde::{Deserialize, Serialize};

use bondval_core::value::{value_names, Payload};

/// Multiplier applied to a calculator result before publication.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    /// No scaling.
    pub const UNIT: ScaleFactor = ScaleFactor(1.0);
    /// Fraction to percent.
    pub const PERCENT: ScaleFactor = ScaleFactor(100.0);
    /// Decimal to basis points.
    pub const BASIS_POINTS: ScaleFactor = ScaleFactor(10_000.0);

    /// Custom factor.
    #[must_use]
    pub const fn new(factor: f64) -> Self {
        ScaleFactor(factor)
    }

    /// The multiplier.
    #[must_use]
    pub const fn factor(self) -> f64 {
        self.0
    }

    /// The conventional factor for a value name.
    #[must_use]
    pub fn for_value_name(value_name: &str) -> Self {
        match value_name {
            value_names::CLEAN_PRICE | value_names::DIRTY_PRICE | value_names::YTM => {
                ScaleFactor::PERCENT
            }
            value_names::Z_SPREAD => ScaleFactor::BASIS_POINTS,
            _ => ScaleFactor::UNIT,
        }
    }

    /// Scales a payload element-wise.
    #[must_use]
    pub fn apply(self, payload: Payload) -> Payload {
        if self.0 == 1.0 {
            payload
        } else {
            payload.scaled(self.0)
        }
    }
}

impl Default for ScaleFactor {
    fn default() -> Self {
        ScaleFactor::UNIT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scale(name: &str, x: f64) -> f64 {
        ScaleFactor::for_value_name(name)
            .apply(Payload::Scalar(x))
            .as_scalar()
            .unwrap()
    }

    #[test]
    fn test_conventional_factors() {
        assert_relative_eq!(scale(value_names::CLEAN_PRICE, 0.98765), 98.765, epsilon = 1e-10);
        assert_relative_eq!(scale(value_names::Z_SPREAD, 0.0042), 42.0, epsilon = 1e-10);
        assert_relative_eq!(scale(value_names::MACAULAY_DURATION, 4.5), 4.5, epsilon = 1e-12);
        assert_relative_eq!(scale(value_names::YTM, 0.0425), 4.25, epsilon = 1e-12);
        assert_relative_eq!(scale(value_names::PV01, 0.0123), 0.0123, epsilon = 1e-12);
    }

    #[test]
    fn test_matrix_scaled_elementwise() {
        let m = ndarray::arr2(&[[0.01, 0.02], [0.03, 0.04]]);
        let Payload::Matrix(scaled) = ScaleFactor::PERCENT.apply(Payload::Matrix(m)) else {
            panic!("matrix payload expected");
        };
        assert_relative_eq!(scaled[[0, 0]], 1.0, epsilon = 1e-12);
        assert_relative_eq!(scaled[[1, 1]], 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_default_is_unit() {
        assert_eq!(ScaleFactor::default(), ScaleFactor::UNIT);
        assert_relative_eq!(ScaleFactor::new(2.5).factor(), 2.5);
    }
}
