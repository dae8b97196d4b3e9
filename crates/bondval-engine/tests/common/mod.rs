//! Shared fixtures for engine integration tests.

#![allow(dead_code)]

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use bondval_config::{DefaultCurveConfig, ResolverConfig};
use bondval_core::prelude::*;
use bondval_core::value::property_names::{CURVE, CURVE_CALCULATION_CONFIG};
use bondval_engine::{FunctionRepository, ValueResolver};
use bondval_traits::{
    BondDerivative, CalculatorId, CurveNames, MarketDataProvider, MarketValue, PricingLibrary,
    PricingMarketData, SourceType, TraitError, TraitResult, YieldCurveData,
};

// =============================================================================
// TARGETS
// =============================================================================

pub fn valuation_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
}

pub fn bond(id: &str, currency: Currency) -> CalculationTarget {
    CalculationTarget::Security(BondSecurity {
        id: id.to_string(),
        currency,
        issuer_name: "ACME CORP".into(),
        issuer_domicile: "US".into(),
        issuer_type: Some("corporate".into()),
        coupon_rate: 0.045,
        coupon_frequency: 2,
        day_count: "30/360".into(),
        issue_date: NaiveDate::from_ymd_opt(2020, 5, 15).unwrap(),
        maturity_date: NaiveDate::from_ymd_opt(2030, 5, 15).unwrap(),
    })
}

pub fn trade(id: &str, security_id: &str, currency: Currency) -> CalculationTarget {
    let security = bond(security_id, currency).security().cloned().unwrap();
    CalculationTarget::Trade(BondTrade {
        id: id.to_string(),
        security,
        quantity: 1_000_000.0,
        trade_date: NaiveDate::from_ymd_opt(2025, 6, 27).unwrap(),
    })
}

// =============================================================================
// MARKET DATA
// =============================================================================

/// In-memory market data keyed the way a snapshot would be.
#[derive(Debug, Default)]
pub struct FixtureMarket {
    curves: Vec<(String, YieldCurveData)>,
    prices: HashMap<String, f64>,
    yields: HashMap<String, f64>,
    withhold_values: bool,
}

impl FixtureMarket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_curve(mut self, currency: Currency, name: &str, config: &str) -> Self {
        let curve = YieldCurveData::new(
            name,
            currency,
            vec![0.5, 1.0, 2.0, 5.0, 10.0],
            vec![0.040, 0.041, 0.042, 0.043, 0.044],
        )
        .unwrap();
        self.curves.push((config.to_string(), curve));
        self
    }

    pub fn with_price(mut self, security: &str, price: f64) -> Self {
        self.prices.insert(security.to_string(), price);
        self
    }

    pub fn with_yield(mut self, security: &str, ytm: f64) -> Self {
        self.yields.insert(security.to_string(), ytm);
        self
    }

    /// Descriptors still resolve but values cannot be fetched.
    pub fn withholding_values(mut self) -> Self {
        self.withhold_values = true;
        self
    }

    fn curve_descriptor(config: &str, curve: &YieldCurveData) -> ValueDescriptor {
        ValueDescriptor::new(
            value_names::YIELD_CURVE,
            TargetRef::currency(curve.currency),
            PropertyConstraintSet::new()
                .with(CURVE, curve.name.as_str())
                .with(CURVE_CALCULATION_CONFIG, config),
        )
        .unwrap()
    }

    fn quote_descriptor(value_name: &str, target: &TargetRef) -> ValueDescriptor {
        ValueDescriptor::new(value_name, target.clone(), PropertyConstraintSet::new()).unwrap()
    }
}

impl MarketDataProvider for FixtureMarket {
    fn source_type(&self) -> SourceType {
        SourceType::Manual
    }

    fn resolve(&self, query: &ValueQuery) -> TraitResult<Option<ValueDescriptor>> {
        let target = query.target();
        let found = match (query.value_name(), target.kind) {
            (value_names::YIELD_CURVE, TargetKind::Currency) => self
                .curves
                .iter()
                .filter(|(_, c)| c.currency.code() == target.id)
                .map(|(config, c)| Self::curve_descriptor(config, c))
                .find(|d| query.is_satisfied_by(d)),
            (value_names::MARKET_CLEAN_PRICE, TargetKind::Security)
                if self.prices.contains_key(&target.id) =>
            {
                Some(Self::quote_descriptor(query.value_name(), target))
            }
            (value_names::MARKET_YTM, TargetKind::Security)
                if self.yields.contains_key(&target.id) =>
            {
                Some(Self::quote_descriptor(query.value_name(), target))
            }
            _ => None,
        };
        Ok(found)
    }

    fn value(&self, descriptor: &ValueDescriptor) -> TraitResult<Option<MarketValue>> {
        if self.withhold_values {
            return Ok(None);
        }
        let id = &descriptor.target().id;
        let value = match descriptor.value_name() {
            value_names::YIELD_CURVE => self
                .curves
                .iter()
                .find(|(config, c)| {
                    c.currency.code() == id
                        && descriptor.property(CURVE) == Some(c.name.as_str())
                        && descriptor.property(CURVE_CALCULATION_CONFIG) == Some(config.as_str())
                })
                .map(|(_, c)| MarketValue::Curve(c.clone())),
            value_names::MARKET_CLEAN_PRICE => self.prices.get(id).copied().map(MarketValue::Price),
            value_names::MARKET_YTM => self.yields.get(id).copied().map(MarketValue::Yield),
            _ => None,
        };
        Ok(value)
    }
}

// =============================================================================
// PRICING
// =============================================================================

#[derive(Debug)]
pub struct StubDerivative {
    pub security_id: String,
    pub curves: Option<CurveNames>,
}

impl BondDerivative for StubDerivative {
    fn security_id(&self) -> &str {
        &self.security_id
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// One recorded calculator call.
#[derive(Debug, Clone)]
pub struct PricingCall {
    pub calculator: CalculatorId,
    pub security_id: String,
    pub curves: Option<CurveNames>,
    pub market: PricingMarketData,
}

/// Returns canned library-unit results and records what it was given.
#[derive(Debug, Default)]
pub struct StubPricing {
    outputs: BTreeMap<CalculatorId, f64>,
    calls: Mutex<Vec<PricingCall>>,
}

impl StubPricing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn returning(mut self, calculator: CalculatorId, raw: f64) -> Self {
        self.outputs.insert(calculator, raw);
        self
    }

    pub fn calls(&self) -> Vec<PricingCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl PricingLibrary for StubPricing {
    fn security_to_derivative(
        &self,
        security: &BondSecurity,
        _date: NaiveDate,
        curves: Option<&CurveNames>,
    ) -> TraitResult<Box<dyn BondDerivative>> {
        Ok(Box::new(StubDerivative {
            security_id: security.id.clone(),
            curves: curves.cloned(),
        }))
    }

    fn evaluate(
        &self,
        calculator: CalculatorId,
        derivative: &dyn BondDerivative,
        market: &PricingMarketData,
    ) -> TraitResult<Payload> {
        let stub = derivative
            .as_any()
            .downcast_ref::<StubDerivative>()
            .ok_or_else(|| TraitError::InvalidInput("foreign derivative".into()))?;
        self.calls.lock().unwrap().push(PricingCall {
            calculator,
            security_id: stub.security_id.clone(),
            curves: stub.curves.clone(),
            market: market.clone(),
        });
        self.outputs
            .get(&calculator)
            .copied()
            .map(Payload::Scalar)
            .ok_or(TraitError::UnsupportedCalculator(calculator.to_string()))
    }
}

// =============================================================================
// RESOLVER
// =============================================================================

pub fn resolver(market: FixtureMarket) -> ValueResolver {
    resolver_with(market, ResolverConfig::default().with_valuation_date(valuation_date()))
}

pub fn resolver_with(market: FixtureMarket, config: ResolverConfig) -> ValueResolver {
    let repository = FunctionRepository::standard(Arc::new(DefaultCurveConfig::standard()));
    ValueResolver::new(Arc::new(repository), Arc::new(market), config)
}
