//! End-to-end resolution tests against an in-memory market and a stub
//! pricing library.

mod common;

use approx::assert_relative_eq;

use bondval_config::ResolverConfig;
use bondval_core::prelude::*;
use bondval_core::value::property_names::{
    CALCULATION_METHOD, CREDIT_CURVE, CREDIT_CURVE_CONFIG, CURRENCY, RISK_FREE_CURVE,
    RISK_FREE_CURVE_CONFIG,
};
use bondval_engine::{AttemptFailure, EngineError, Rejection, Resolution, ResolutionRequest};
use bondval_traits::{CalculatorId, CurveId, CurveNames};

use common::{bond, resolver, resolver_with, trade, valuation_date, FixtureMarket, StubPricing};

const USD_CONFIG: &str = "DefaultTwoCurveUSDConfig";

fn usd_market() -> FixtureMarket {
    FixtureMarket::new().with_curve(Currency::USD, "Discounting", USD_CONFIG)
}

fn curves(rf: (&str, &str), credit: (&str, &str)) -> PropertyConstraintSet {
    PropertyConstraintSet::new()
        .with(RISK_FREE_CURVE, rf.0)
        .with(RISK_FREE_CURVE_CONFIG, rf.1)
        .with(CREDIT_CURVE, credit.0)
        .with(CREDIT_CURVE_CONFIG, credit.1)
}

fn scalar(value: &ComputedValue) -> f64 {
    value.payload().as_scalar().unwrap()
}

// =============================================================================
// DEFAULT INJECTION
// =============================================================================

#[test]
fn test_usd_clean_price_uses_default_curves() {
    let resolver = resolver(usd_market());
    let pricing = StubPricing::new().returning(CalculatorId::CleanPriceFromCurves, 0.98765);
    let ctx = resolver.context(&pricing).unwrap();
    let target = bond("US0001", Currency::USD);
    let query = ValueQuery::unconstrained(value_names::CLEAN_PRICE, target.reference());

    let plan = resolver.plan(&target, &query).unwrap().into_resolved().unwrap();
    assert_eq!(plan.function_id, "CleanPrice.FromCurves.shared");
    assert_eq!(plan.injected_by, vec!["DefaultCurveProperties".to_string()]);
    assert_eq!(plan.inputs.len(), 1);

    let value = resolver
        .resolve(&ctx, &target, &query)
        .unwrap()
        .into_resolved()
        .unwrap();
    let d = value.descriptor();
    assert_eq!(d.property(RISK_FREE_CURVE), Some("Discounting"));
    assert_eq!(d.property(RISK_FREE_CURVE_CONFIG), Some(USD_CONFIG));
    assert_eq!(d.property(CREDIT_CURVE), Some("Discounting"));
    assert_eq!(d.property(CREDIT_CURVE_CONFIG), Some(USD_CONFIG));
    assert_eq!(d.property(CALCULATION_METHOD), Some("FromCurves"));
    assert_eq!(d.property(CURRENCY), Some("USD"));
    assert!(d.properties().is_strict());
    assert!(query.is_satisfied_by(d));
    assert_relative_eq!(scalar(&value), 98.765, epsilon = 1e-10);

    let calls = pricing.calls();
    assert_eq!(calls.len(), 1);
    let disc = CurveId::new("Discounting", USD_CONFIG);
    assert_eq!(calls[0].curves, Some(CurveNames::new(disc.clone(), disc.clone())));
    assert!(calls[0].market.curve(&disc).is_some());
}

#[test]
fn test_explicit_curves_are_not_overridden() {
    let market = usd_market().with_curve(Currency::USD, "SOFR", "SofrCfg");
    let resolver = resolver(market);
    let target = bond("US0001", Currency::USD);
    let query = ValueQuery::new(
        value_names::CLEAN_PRICE,
        target.reference(),
        PropertyConstraintSet::new()
            .with(RISK_FREE_CURVE, "SOFR")
            .with(RISK_FREE_CURVE_CONFIG, "SofrCfg"),
    );

    let plan = resolver.plan(&target, &query).unwrap().into_resolved().unwrap();
    assert_eq!(plan.function_id, "CleanPrice.FromCurves.distinct");
    assert_eq!(plan.descriptor.property(RISK_FREE_CURVE), Some("SOFR"));
    assert_eq!(plan.descriptor.property(CREDIT_CURVE), Some("Discounting"));
    assert_eq!(plan.descriptor.property(CREDIT_CURVE_CONFIG), Some(USD_CONFIG));
}

// =============================================================================
// SCALING
// =============================================================================

#[test]
fn test_z_spread_published_in_basis_points() {
    let market = usd_market().with_price("US0001", 99.5);
    let resolver = resolver(market);
    let pricing = StubPricing::new().returning(CalculatorId::ZSpreadFromCleanPrice, 0.0042);
    let ctx = resolver.context(&pricing).unwrap();
    let target = bond("US0001", Currency::USD);
    let query = ValueQuery::unconstrained(value_names::Z_SPREAD, target.reference());

    let value = resolver
        .resolve(&ctx, &target, &query)
        .unwrap()
        .into_resolved()
        .unwrap();
    assert_relative_eq!(scalar(&value), 42.0, epsilon = 1e-9);
    assert_eq!(
        value.descriptor().property(CALCULATION_METHOD),
        Some("FromCleanPrice")
    );

    // Percent quote reaches the calculator as a fraction of par.
    let calls = pricing.calls();
    assert_relative_eq!(calls[0].market.clean_price.unwrap(), 0.995, epsilon = 1e-12);
}

#[test]
fn test_duration_is_not_scaled() {
    let market = FixtureMarket::new().with_yield("US0001", 4.25);
    let resolver = resolver(market);
    let pricing = StubPricing::new().returning(CalculatorId::MacaulayDurationFromYield, 4.5);
    let ctx = resolver.context(&pricing).unwrap();
    let target = bond("US0001", Currency::USD);
    let query = ValueQuery::new(
        value_names::MACAULAY_DURATION,
        target.reference(),
        PropertyConstraintSet::new().with(CALCULATION_METHOD, "FromYield"),
    );

    let value = resolver
        .resolve(&ctx, &target, &query)
        .unwrap()
        .into_resolved()
        .unwrap();
    assert_relative_eq!(scalar(&value), 4.5);
    assert_relative_eq!(
        pricing.calls()[0].market.yield_to_maturity.unwrap(),
        0.0425,
        epsilon = 1e-12
    );
}

// =============================================================================
// CURVE LAYOUTS
// =============================================================================

#[test]
fn test_distinct_curves_keep_their_roles() {
    let market = usd_market().with_curve(Currency::USD, "ACME", "CreditCfg");
    let resolver = resolver(market);
    let pricing = StubPricing::new().returning(CalculatorId::Pv01FromCurves, 0.0712);
    let ctx = resolver.context(&pricing).unwrap();
    let target = bond("US0001", Currency::USD);
    let query = ValueQuery::new(
        value_names::PV01,
        target.reference(),
        curves(("Discounting", USD_CONFIG), ("ACME", "CreditCfg")),
    );

    let value = resolver
        .resolve(&ctx, &target, &query)
        .unwrap()
        .into_resolved()
        .unwrap();
    let d = value.descriptor();
    assert_eq!(d.property(RISK_FREE_CURVE), Some("Discounting"));
    assert_eq!(d.property(RISK_FREE_CURVE_CONFIG), Some(USD_CONFIG));
    assert_eq!(d.property(CREDIT_CURVE), Some("ACME"));
    assert_eq!(d.property(CREDIT_CURVE_CONFIG), Some("CreditCfg"));
    assert_relative_eq!(scalar(&value), 0.0712);

    let calls = pricing.calls();
    assert_eq!(
        calls[0].curves,
        Some(CurveNames::new(
            CurveId::new("Discounting", USD_CONFIG),
            CurveId::new("ACME", "CreditCfg"),
        ))
    );
    assert_eq!(calls[0].market.curves.len(), 2);
}

#[test]
fn test_same_curve_name_under_two_configs_prices_both() {
    let market = FixtureMarket::new()
        .with_curve(Currency::USD, "Discounting", "CfgA")
        .with_curve(Currency::USD, "Discounting", "CfgB");
    let resolver = resolver(market);
    let pricing = StubPricing::new().returning(CalculatorId::CleanPriceFromCurves, 0.99);
    let ctx = resolver.context(&pricing).unwrap();
    let target = bond("US0001", Currency::USD);
    let query = ValueQuery::new(
        value_names::CLEAN_PRICE,
        target.reference(),
        curves(("Discounting", "CfgA"), ("Discounting", "CfgB")),
    );

    let plan = resolver.plan(&target, &query).unwrap().into_resolved().unwrap();
    assert_eq!(plan.function_id, "CleanPrice.FromCurves.distinct");
    assert_eq!(plan.inputs.len(), 2);

    let value = resolver
        .resolve(&ctx, &target, &query)
        .unwrap()
        .into_resolved()
        .unwrap();
    let d = value.descriptor();
    assert_eq!(d.property(RISK_FREE_CURVE_CONFIG), Some("CfgA"));
    assert_eq!(d.property(CREDIT_CURVE_CONFIG), Some("CfgB"));

    let calls = pricing.calls();
    let names = calls[0].curves.clone().unwrap();
    assert!(!names.is_shared());
    assert_eq!(names.risk_free, CurveId::new("Discounting", "CfgA"));
    assert_eq!(names.credit, CurveId::new("Discounting", "CfgB"));
    assert_eq!(calls[0].market.curves.len(), 2);
    assert!(calls[0].market.curves_for(&names).is_some());
}

// =============================================================================
// BACKTRACKING
// =============================================================================

#[test]
fn test_falls_back_to_yield_when_no_curves() {
    let market = FixtureMarket::new().with_yield("US0001", 4.1);
    let resolver = resolver(market);
    let pricing = StubPricing::new().returning(CalculatorId::CleanPriceFromYield, 0.97);
    let ctx = resolver.context(&pricing).unwrap();
    let target = bond("US0001", Currency::USD);
    let query = ValueQuery::unconstrained(value_names::CLEAN_PRICE, target.reference());

    let plan = resolver.plan(&target, &query).unwrap().into_resolved().unwrap();
    assert_eq!(plan.function_id, "CleanPrice.FromYield");
    assert!(!plan.is_injected());
    assert_eq!(&plan.query, &query);

    let value = resolver.execute(&ctx, &target, &plan).unwrap();
    assert_relative_eq!(scalar(&value), 97.0, epsilon = 1e-10);
    assert_eq!(value.descriptor().property(CALCULATION_METHOD), Some("FromYield"));
    assert!(!value.descriptor().properties().is_defined(RISK_FREE_CURVE));
}

#[test]
fn test_trade_reads_quotes_of_its_security() {
    let market = FixtureMarket::new().with_yield("US0001", 4.1);
    let resolver = resolver(market);
    let pricing = StubPricing::new().returning(CalculatorId::CleanPriceFromYield, 0.97);
    let ctx = resolver.context(&pricing).unwrap();
    let target = trade("T1", "US0001", Currency::USD);
    let query = ValueQuery::unconstrained(value_names::CLEAN_PRICE, target.reference());

    let plan = resolver.plan(&target, &query).unwrap().into_resolved().unwrap();
    assert_eq!(plan.function_id, "CleanPrice.FromYield");
    assert_eq!(plan.inputs.len(), 1);
    assert_eq!(plan.inputs[0].query.target(), &TargetRef::security("US0001"));
    assert_eq!(plan.inputs[0].query.value_name(), value_names::MARKET_YTM);

    let value = resolver.execute(&ctx, &target, &plan).unwrap();
    assert_eq!(value.descriptor().target(), &TargetRef::trade("T1"));
    assert_eq!(value.descriptor().property(CALCULATION_METHOD), Some("FromYield"));
    assert_eq!(value.descriptor().property(CURRENCY), Some("USD"));
    assert_relative_eq!(scalar(&value), 97.0, epsilon = 1e-10);

    let calls = pricing.calls();
    assert_eq!(calls[0].security_id, "US0001");
    assert_relative_eq!(calls[0].market.yield_to_maturity.unwrap(), 0.041, epsilon = 1e-12);
}

#[test]
fn test_no_fallback_when_disabled() {
    let market = FixtureMarket::new().with_yield("US0001", 4.1);
    let config = ResolverConfig::default()
        .with_valuation_date(valuation_date())
        .with_fallback(false);
    let resolver = resolver_with(market, config);
    let target = bond("US0001", Currency::USD);
    let query = ValueQuery::unconstrained(value_names::CLEAN_PRICE, target.reference());

    match resolver.plan(&target, &query).unwrap() {
        Resolution::Unsatisfiable(u) => {
            assert_eq!(u.query, query);
            let ids: Vec<_> = u.attempts.iter().map(|a| a.function_id.as_str()).collect();
            assert_eq!(
                ids,
                vec![
                    "CleanPrice.FromCurves.shared",
                    "CleanPrice.FromCurves.distinct",
                    "CleanPrice.FromYield",
                ]
            );
            assert!(matches!(
                u.attempts[0].failure,
                AttemptFailure::UpstreamUnavailable { .. }
            ));
            assert!(matches!(
                u.attempts[1].failure,
                AttemptFailure::Rejected(Rejection::CurveLayoutMismatch { .. })
            ));
            assert_eq!(u.attempts[2].failure, AttemptFailure::CannotProduce);
        }
        Resolution::Resolved(plan) => panic!("unexpected plan {:?}", plan),
    }
}

#[test]
fn test_ambiguous_curve_request_is_unsatisfiable() {
    let market = usd_market().with_curve(Currency::USD, "Forward3M", USD_CONFIG);
    let resolver = resolver(market);
    let target = bond("US0001", Currency::USD);
    let constraints = curves(("Discounting", USD_CONFIG), ("Discounting", USD_CONFIG))
        .with_values(RISK_FREE_CURVE, ["Discounting", "Forward3M"])
        .unwrap();
    let query = ValueQuery::new(value_names::CLEAN_PRICE, target.reference(), constraints);

    let Resolution::Unsatisfiable(u) = resolver.plan(&target, &query).unwrap() else {
        panic!("ambiguous request resolved");
    };
    let ambiguous: Vec<_> = u
        .attempts
        .iter()
        .filter_map(|a| match &a.failure {
            AttemptFailure::Rejected(Rejection::AmbiguousConstraint { property, .. }) => {
                Some(property.as_str())
            }
            _ => None,
        })
        .collect();
    assert_eq!(ambiguous, vec![RISK_FREE_CURVE, RISK_FREE_CURVE]);
}

#[test]
fn test_unknown_value_name() {
    let resolver = resolver(usd_market());
    let target = bond("US0001", Currency::USD);
    let query = ValueQuery::unconstrained("Option Adjusted Spread", target.reference());

    let Resolution::Unsatisfiable(u) = resolver.plan(&target, &query).unwrap() else {
        panic!("nothing produces this value");
    };
    assert!(u.attempts.is_empty());
}

// =============================================================================
// HARD FAILURES
// =============================================================================

#[test]
fn test_missing_upstream_value_is_an_error() {
    let resolver = resolver(usd_market().withholding_values());
    let pricing = StubPricing::new().returning(CalculatorId::CleanPriceFromCurves, 0.99);
    let ctx = resolver.context(&pricing).unwrap();
    let target = bond("US0001", Currency::USD);
    let query = ValueQuery::unconstrained(value_names::CLEAN_PRICE, target.reference());

    let err = resolver.resolve(&ctx, &target, &query).unwrap_err();
    assert!(matches!(err, EngineError::MissingUpstreamValue(_)));
    assert!(pricing.calls().is_empty());
}

#[test]
fn test_pricing_failure_is_an_error() {
    let resolver = resolver(usd_market());
    let pricing = StubPricing::new();
    let ctx = resolver.context(&pricing).unwrap();
    let target = bond("US0001", Currency::USD);
    let query = ValueQuery::unconstrained(value_names::CONVEXITY, target.reference());

    let err = resolver.resolve(&ctx, &target, &query).unwrap_err();
    assert!(matches!(err, EngineError::Pricing(_)));
}

#[test]
fn test_context_requires_valuation_date() {
    let resolver = resolver_with(usd_market(), ResolverConfig::default());
    let pricing = StubPricing::new();
    assert!(matches!(
        resolver.context(&pricing),
        Err(EngineError::Config(_))
    ));
}

// =============================================================================
// BATCH
// =============================================================================

#[test]
fn test_resolve_all_keeps_request_order() {
    let mut market = usd_market();
    let mut requests = Vec::new();
    for i in 0..12 {
        let id = format!("US{:04}", i);
        market = market.with_price(&id, 99.0 + f64::from(i) / 10.0);
        requests.push(ResolutionRequest::unconstrained(
            bond(&id, Currency::USD),
            value_names::Z_SPREAD,
        ));
    }
    // No defaults, no curves, no quotes.
    requests.insert(
        5,
        ResolutionRequest::unconstrained(bond("CH0001", Currency::CHF), value_names::Z_SPREAD),
    );

    let resolver = resolver(market);
    let pricing = StubPricing::new().returning(CalculatorId::ZSpreadFromCleanPrice, 0.0125);
    let ctx = resolver.context(&pricing).unwrap();

    let results = resolver.resolve_all(&ctx, &requests);
    assert_eq!(results.len(), requests.len());
    for (request, result) in requests.iter().zip(&results) {
        match result {
            Ok(Resolution::Resolved(value)) => {
                assert_eq!(value.descriptor().target(), request.query.target());
                assert_relative_eq!(scalar(value), 125.0, epsilon = 1e-9);
            }
            Ok(Resolution::Unsatisfiable(u)) => assert_eq!(u.query.target().id, "CH0001"),
            Err(e) => panic!("unexpected error {}", e),
        }
    }

    let batch = resolver.resolve_batch(&ctx, &requests);
    assert_eq!(batch.resolved, 12);
    assert_eq!(batch.unsatisfiable, 1);
    assert_eq!(batch.failed, 0);
}
