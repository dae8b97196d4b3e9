//! Well-known value and property names.

/// Names of values that can be queried.
pub mod value_names {
    /// Clean price of a bond, in percent of par.
    pub const CLEAN_PRICE: &str = "Clean Price";
    /// Dirty price of a bond, in percent of par.
    pub const DIRTY_PRICE: &str = "Dirty Price";
    /// Yield to maturity of a bond, in percent.
    pub const YTM: &str = "Yield To Maturity";
    /// Macaulay duration of a bond.
    pub const MACAULAY_DURATION: &str = "Macaulay Duration";
    /// Modified duration of a bond.
    pub const MODIFIED_DURATION: &str = "Modified Duration";
    /// Convexity of a bond.
    pub const CONVEXITY: &str = "Convexity";
    /// Sensitivity of present value to a one basis point parallel curve shift.
    pub const PV01: &str = "PV01";
    /// Z-spread of a bond, in basis points.
    pub const Z_SPREAD: &str = "Z Spread";
    /// Sensitivity of present value to a unit change in the Z-spread.
    pub const PRESENT_VALUE_Z_SPREAD_SENSITIVITY: &str = "PV Z Spread Sensitivity";

    /// Quoted market clean price, in percent of par.
    pub const MARKET_CLEAN_PRICE: &str = "Market Clean Price";
    /// Quoted market yield to maturity, in percent.
    pub const MARKET_YTM: &str = "Market Yield To Maturity";
    /// A yield curve, targeted at a currency.
    pub const YIELD_CURVE: &str = "YieldCurve";

    /// Every derived bond measure.
    pub const BOND_MEASURES: [&str; 9] = [
        CLEAN_PRICE,
        DIRTY_PRICE,
        YTM,
        MACAULAY_DURATION,
        MODIFIED_DURATION,
        CONVEXITY,
        PV01,
        Z_SPREAD,
        PRESENT_VALUE_Z_SPREAD_SENSITIVITY,
    ];
}

/// Names of properties used in constraint sets.
pub mod property_names {
    /// Name of the risk-free (discounting) curve used.
    pub const RISK_FREE_CURVE: &str = "RiskFreeCurve";
    /// Calculation configuration of the risk-free curve.
    pub const RISK_FREE_CURVE_CONFIG: &str = "RiskFreeCurveCalculationConfig";
    /// Name of the credit (issuer) curve used.
    pub const CREDIT_CURVE: &str = "CreditCurve";
    /// Calculation configuration of the credit curve.
    pub const CREDIT_CURVE_CONFIG: &str = "CreditCurveCalculationConfig";

    /// The four curve properties a curve-based function parameterizes on.
    pub const CURVE_PROPERTIES: [&str; 4] = [
        RISK_FREE_CURVE,
        RISK_FREE_CURVE_CONFIG,
        CREDIT_CURVE,
        CREDIT_CURVE_CONFIG,
    ];

    /// Name of a yield curve on a yield curve query or descriptor.
    pub const CURVE: &str = "Curve";
    /// Calculation configuration of a yield curve.
    pub const CURVE_CALCULATION_CONFIG: &str = "CurveCalculationConfig";

    /// Which data source a figure was derived from.
    pub const CALCULATION_METHOD: &str = "CalculationMethod";
    /// Currency of the result.
    pub const CURRENCY: &str = "Currency";
}

/// Values of the [`CALCULATION_METHOD`](property_names::CALCULATION_METHOD) property.
pub mod calculation_methods {
    /// Derived from yield curves.
    pub const FROM_CURVES: &str = "FromCurves";
    /// Derived from a quoted clean price.
    pub const FROM_CLEAN_PRICE: &str = "FromCleanPrice";
    /// Derived from a quoted yield.
    pub const FROM_YIELD: &str = "FromYield";
}
