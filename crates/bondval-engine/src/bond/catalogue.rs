//! The standard bond function catalogue.

use bondval_core::value::value_names::{
    CLEAN_PRICE, CONVEXITY, DIRTY_PRICE, MACAULAY_DURATION, MODIFIED_DURATION,
    PRESENT_VALUE_Z_SPREAD_SENSITIVITY, PV01, YTM, Z_SPREAD,
};
use bondval_traits::CalculatorId as C;

use super::function::BondFunction;
use super::source::{CurveLayout, DataSource};

const CURVE_MEASURES: [(&str, C); 7] = [
    (CLEAN_PRICE, C::CleanPriceFromCurves),
    (DIRTY_PRICE, C::DirtyPriceFromCurves),
    (YTM, C::YieldFromCurves),
    (MACAULAY_DURATION, C::MacaulayDurationFromCurves),
    (MODIFIED_DURATION, C::ModifiedDurationFromCurves),
    (CONVEXITY, C::ConvexityFromCurves),
    (PV01, C::Pv01FromCurves),
];

const CLEAN_PRICE_MEASURES: [(&str, C); 5] = [
    (DIRTY_PRICE, C::DirtyPriceFromCleanPrice),
    (YTM, C::YieldFromCleanPrice),
    (MACAULAY_DURATION, C::MacaulayDurationFromCleanPrice),
    (MODIFIED_DURATION, C::ModifiedDurationFromCleanPrice),
    (CONVEXITY, C::ConvexityFromCleanPrice),
];

const SPREAD_MEASURES: [(&str, C); 2] = [
    (Z_SPREAD, C::ZSpreadFromCleanPrice),
    (
        PRESENT_VALUE_Z_SPREAD_SENSITIVITY,
        C::PvZSpreadSensitivityFromCleanPrice,
    ),
];

const YIELD_MEASURES: [(&str, C); 5] = [
    (CLEAN_PRICE, C::CleanPriceFromYield),
    (DIRTY_PRICE, C::DirtyPriceFromYield),
    (MACAULAY_DURATION, C::MacaulayDurationFromYield),
    (MODIFIED_DURATION, C::ModifiedDurationFromYield),
    (CONVEXITY, C::ConvexityFromYield),
];

const LAYOUTS: [CurveLayout; 2] = [CurveLayout::Shared, CurveLayout::Distinct];

/// Every standard bond function, in registration order.
///
/// Curve-based functions come in both layouts; exactly one of each pair can
/// serve a given query.
pub fn standard_bond_functions() -> Vec<BondFunction> {
    let mut functions = Vec::new();

    for layout in LAYOUTS {
        for (name, calculator) in CURVE_MEASURES {
            functions.push(BondFunction::new(name, DataSource::Curves { layout }, calculator));
        }
    }

    for (name, calculator) in CLEAN_PRICE_MEASURES {
        functions.push(BondFunction::new(
            name,
            DataSource::CleanPrice { curves: None },
            calculator,
        ));
    }
    for layout in LAYOUTS {
        for (name, calculator) in SPREAD_MEASURES {
            functions.push(BondFunction::new(
                name,
                DataSource::CleanPrice {
                    curves: Some(layout),
                },
                calculator,
            ));
        }
    }

    for (name, calculator) in YIELD_MEASURES {
        functions.push(BondFunction::new(name, DataSource::Yield, calculator));
    }

    functions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::ComputationFunction;
    use std::collections::BTreeSet;

    #[test]
    fn test_catalogue_size_and_unique_ids() {
        let functions = standard_bond_functions();
        assert_eq!(functions.len(), 7 * 2 + 5 + 2 * 2 + 5);
        let ids: BTreeSet<_> = functions.iter().map(|f| f.id().to_string()).collect();
        assert_eq!(ids.len(), functions.len());
    }

    #[test]
    fn test_every_bond_measure_is_covered() {
        let functions = standard_bond_functions();
        for name in bondval_core::value::value_names::BOND_MEASURES {
            assert!(
                functions.iter().any(|f| f.value_name() == name),
                "no function for {}",
                name
            );
        }
    }

    #[test]
    fn test_z_spread_reads_price_and_curves() {
        let functions = standard_bond_functions();
        let z = functions
            .iter()
            .find(|f| f.value_name() == Z_SPREAD)
            .unwrap();
        assert_eq!(z.source().quote_value_name(), Some("Market Clean Price"));
        assert!(z.source().curve_layout().is_some());
        assert!((z.scale().factor() - 10_000.0).abs() < f64::EPSILON);
    }
}
