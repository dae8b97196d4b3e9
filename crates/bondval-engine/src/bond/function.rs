//! The generic bond function.
//!
//! One [`BondFunction`] type covers every (data source, calculator, value
//! name) combination in the catalogue. What differs between them is data:
//! which upstream values are required, which calculator runs, how the result
//! is scaled.

use tracing::debug;

use bondval_core::prelude::*;
use bondval_core::value::property_names::{
    CALCULATION_METHOD, CREDIT_CURVE, CREDIT_CURVE_CONFIG, CURRENCY, CURVE,
    CURVE_CALCULATION_CONFIG, CURVE_PROPERTIES, RISK_FREE_CURVE, RISK_FREE_CURVE_CONFIG,
};
use bondval_traits::{CalculatorId, CurveId, CurveNames, MarketValue, PricingMarketData};

use super::source::{CurveLayout, DataSource};
use crate::error::{EngineError, EngineResult};
use crate::function::{
    ComputationFunction, ExecutionContext, InputBinding, Rejection, Requirements, ResolvedInput,
};
use crate::scale::ScaleFactor;

/// A (curve name, calculation configuration) pair.
type CurveKey<'a> = (&'a str, &'a str);

/// The curves a query asks for, one concrete pair per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CurveRequest<'a> {
    risk_free: CurveKey<'a>,
    credit: CurveKey<'a>,
}

/// A bond measure computed from one data source.
#[derive(Debug, Clone)]
pub struct BondFunction {
    id: String,
    value_name: &'static str,
    source: DataSource,
    calculator: CalculatorId,
    scale: ScaleFactor,
    priority: i32,
}

impl BondFunction {
    /// Creates a function with the conventional scale factor and the
    /// source's default priority.
    pub fn new(value_name: &'static str, source: DataSource, calculator: CalculatorId) -> Self {
        let mut id = format!("{}.{}", value_name.replace(' ', ""), source.calculation_method());
        if let Some(layout) = source.curve_layout() {
            id.push('.');
            id.push_str(layout.as_str());
        }
        Self {
            id,
            value_name,
            source,
            calculator,
            scale: ScaleFactor::for_value_name(value_name),
            priority: default_priority(source),
        }
    }

    /// Overrides the scale factor.
    #[must_use]
    pub fn with_scale(mut self, scale: ScaleFactor) -> Self {
        self.scale = scale;
        self
    }

    /// Overrides the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// The data source.
    #[must_use]
    pub fn source(&self) -> DataSource {
        self.source
    }

    /// The calculator.
    #[must_use]
    pub fn calculator(&self) -> CalculatorId {
        self.calculator
    }

    /// The scale factor.
    #[must_use]
    pub fn scale(&self) -> ScaleFactor {
        self.scale
    }

    fn base_properties(&self, target: &CalculationTarget) -> PropertyConstraintSet {
        PropertyConstraintSet::new()
            .with(CALCULATION_METHOD, self.source.calculation_method())
            .with(CURRENCY, target.currency().code())
    }

    fn check_query(
        &self,
        target: &CalculationTarget,
        desired: &ValueQuery,
    ) -> Result<(), Rejection> {
        if desired.value_name() != self.value_name {
            return Err(Rejection::WrongValueName {
                produces: self.value_name.to_string(),
            });
        }
        if !self.can_apply(target) || desired.target() != &target.reference() {
            return Err(Rejection::UnsupportedTarget {
                target: desired.target().to_string(),
            });
        }
        let unmet = desired
            .constraints()
            .unsatisfied(&self.result_template(target).properties);
        if !unmet.is_empty() {
            return Err(Rejection::IncompatibleConstraints { properties: unmet });
        }
        Ok(())
    }

    /// Extracts one concrete curve per role and checks it against `layout`.
    fn curve_request<'q>(
        layout: CurveLayout,
        constraints: &'q PropertyConstraintSet,
    ) -> Result<CurveRequest<'q>, Rejection> {
        let strict = |property: &str| {
            constraints
                .strict_value(property)
                .ok_or_else(|| Rejection::ambiguous(property, constraints))
        };
        let request = CurveRequest {
            risk_free: (strict(RISK_FREE_CURVE)?, strict(RISK_FREE_CURVE_CONFIG)?),
            credit: (strict(CREDIT_CURVE)?, strict(CREDIT_CURVE_CONFIG)?),
        };
        if !layout.accepts(request.risk_free, request.credit) {
            return Err(Rejection::CurveLayoutMismatch {
                expected: layout.to_string(),
            });
        }
        Ok(request)
    }

    fn quote_query(&self, security: &BondSecurity) -> Option<ValueQuery> {
        self.source
            .quote_value_name()
            .map(|name| ValueQuery::unconstrained(name, TargetRef::security(&security.id)))
    }

    /// Finds the binding whose descriptor satisfies a role's curve query.
    fn bound_curve(query: &ValueQuery, inputs: &[InputBinding]) -> EngineResult<(String, String)> {
        let binding = inputs
            .iter()
            .find(|b| query.is_satisfied_by(&b.descriptor))
            .ok_or_else(|| EngineError::missing(query))?;
        let property = |name: &str| {
            binding
                .descriptor
                .property(name)
                .map(str::to_string)
                .ok_or_else(|| {
                    EngineError::unsupported(format!(
                        "curve descriptor {} has no concrete {}",
                        binding.descriptor, name
                    ))
                })
        };
        Ok((property(CURVE)?, property(CURVE_CALCULATION_CONFIG)?))
    }

    fn pricing_market_data(
        &self,
        curves: Option<&CurveNames>,
        inputs: &[ResolvedInput],
    ) -> EngineResult<PricingMarketData> {
        let mut market = PricingMarketData::new();
        for input in inputs {
            match &input.value {
                MarketValue::Curve(curve) => {
                    let descriptor = &input.binding.descriptor;
                    let id = CurveId::new(
                        descriptor.property(CURVE).unwrap_or(curve.name.as_str()),
                        descriptor.property(CURVE_CALCULATION_CONFIG).unwrap_or_default(),
                    );
                    market.curves.insert(id, curve.clone());
                }
                // Quotes arrive in percent.
                MarketValue::Price(price) => market.clean_price = Some(price / 100.0),
                MarketValue::Yield(ytm) => market.yield_to_maturity = Some(ytm / 100.0),
            }
        }

        if let Some(names) = curves {
            for id in [&names.risk_free, &names.credit] {
                if market.curve(id).is_none() {
                    return Err(EngineError::missing(format!("curve '{}'", id)));
                }
            }
        }
        match self.source {
            DataSource::CleanPrice { .. } if market.clean_price.is_none() => {
                Err(EngineError::missing(value_names::MARKET_CLEAN_PRICE))
            }
            DataSource::Yield if market.yield_to_maturity.is_none() => {
                Err(EngineError::missing(value_names::MARKET_YTM))
            }
            _ => Ok(market),
        }
    }
}

fn default_priority(source: DataSource) -> i32 {
    match source {
        DataSource::Curves { .. } => 2,
        DataSource::CleanPrice { .. } => 1,
        DataSource::Yield => 0,
    }
}

fn curve_query(currency: Currency, (name, config): CurveKey<'_>) -> ValueQuery {
    ValueQuery::new(
        value_names::YIELD_CURVE,
        TargetRef::currency(currency),
        PropertyConstraintSet::new()
            .with(CURVE, name)
            .with(CURVE_CALCULATION_CONFIG, config),
    )
}

impl ComputationFunction for BondFunction {
    fn id(&self) -> &str {
        &self.id
    }

    fn value_name(&self) -> &str {
        self.value_name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn can_apply(&self, target: &CalculationTarget) -> bool {
        target.security().is_some()
    }

    fn result_template(&self, target: &CalculationTarget) -> ValueTemplate {
        let mut properties = self.base_properties(target);
        if self.source.curve_layout().is_some() {
            for property in CURVE_PROPERTIES {
                properties = properties.with_any(property);
            }
        }
        ValueTemplate::new(self.value_name, target.reference(), properties)
    }

    fn requirements(&self, target: &CalculationTarget, desired: &ValueQuery) -> Requirements {
        if let Err(rejection) = self.check_query(target, desired) {
            return Requirements::CannotContribute(rejection);
        }
        let Some(security) = target.security() else {
            return Requirements::CannotContribute(Rejection::UnsupportedTarget {
                target: desired.target().to_string(),
            });
        };

        let mut needs = Vec::new();
        if let Some(layout) = self.source.curve_layout() {
            let request = match Self::curve_request(layout, desired.constraints()) {
                Ok(request) => request,
                Err(rejection) => return Requirements::CannotContribute(rejection),
            };
            needs.push(curve_query(security.currency, request.risk_free));
            if layout == CurveLayout::Distinct {
                needs.push(curve_query(security.currency, request.credit));
            }
        }
        needs.extend(self.quote_query(security));
        Requirements::Needs(needs)
    }

    fn result_concrete(
        &self,
        target: &CalculationTarget,
        desired: &ValueQuery,
        inputs: &[InputBinding],
    ) -> EngineResult<ValueDescriptor> {
        let unsupported = |r: Rejection| EngineError::unsupported(format!("{}: {}", self.id, r));
        self.check_query(target, desired).map_err(unsupported)?;

        let mut properties = self.base_properties(target);
        if let Some(layout) = self.source.curve_layout() {
            let request =
                Self::curve_request(layout, desired.constraints()).map_err(unsupported)?;
            let currency = target.currency();
            let risk_free = Self::bound_curve(&curve_query(currency, request.risk_free), inputs)?;
            let credit = match layout {
                CurveLayout::Shared => risk_free.clone(),
                CurveLayout::Distinct => {
                    Self::bound_curve(&curve_query(currency, request.credit), inputs)?
                }
            };
            properties = properties
                .with(RISK_FREE_CURVE, risk_free.0)
                .with(RISK_FREE_CURVE_CONFIG, risk_free.1)
                .with(CREDIT_CURVE, credit.0)
                .with(CREDIT_CURVE_CONFIG, credit.1);
        }
        if let Some(quote) = target.security().and_then(|s| self.quote_query(s)) {
            if !inputs.iter().any(|b| quote.is_satisfied_by(&b.descriptor)) {
                return Err(EngineError::missing(&quote));
            }
        }

        let descriptor = ValueDescriptor::new(self.value_name, target.reference(), properties)?;
        if !desired.is_satisfied_by(&descriptor) {
            return Err(EngineError::unsupported(format!(
                "{} would publish {} which does not satisfy {}",
                self.id, descriptor, desired
            )));
        }
        Ok(descriptor)
    }

    fn calculate(
        &self,
        ctx: &ExecutionContext<'_>,
        target: &CalculationTarget,
        desired: &ValueQuery,
        inputs: &[ResolvedInput],
    ) -> EngineResult<ComputedValue> {
        let bindings: Vec<InputBinding> = inputs.iter().map(|i| i.binding.clone()).collect();
        let descriptor = self.result_concrete(target, desired, &bindings)?;
        let security = target
            .security()
            .ok_or_else(|| EngineError::unsupported(format!("{} needs a bond target", self.id)))?;

        let role = |name: &str, config: &str| {
            Some(CurveId::new(descriptor.property(name)?, descriptor.property(config)?))
        };
        let curves = match (
            role(RISK_FREE_CURVE, RISK_FREE_CURVE_CONFIG),
            role(CREDIT_CURVE, CREDIT_CURVE_CONFIG),
        ) {
            (Some(risk_free), Some(credit)) => Some(CurveNames::new(risk_free, credit)),
            _ => None,
        };
        let market = self.pricing_market_data(curves.as_ref(), inputs)?;

        let derivative =
            ctx.pricing
                .security_to_derivative(security, ctx.valuation_date, curves.as_ref())?;
        let raw = ctx
            .pricing
            .evaluate(self.calculator, &*derivative, &market)?;

        debug!(
            function = %self.id,
            calculator = %self.calculator,
            security = %security.id,
            "Calculated {}",
            descriptor
        );
        Ok(ComputedValue::new(descriptor, self.scale.apply(raw)))
    }
}
