//! Default curve property injection.
//!
//! Callers often ask for "the clean price" without naming curves. Before any
//! function sees such a query, [`DefaultCurvePropertyFunction`] fills in the
//! risk-free and credit curves configured for the bond's currency. Only
//! properties that are absent or wildcards are filled; anything the caller
//! stated explicitly is left alone.

use std::sync::Arc;

use tracing::debug;

use bondval_config::DefaultCurveConfig;
use bondval_core::prelude::*;
use bondval_core::value::property_names::{
    CREDIT_CURVE, CREDIT_CURVE_CONFIG, RISK_FREE_CURVE, RISK_FREE_CURVE_CONFIG,
};

use crate::function::PropertyInjector;

/// Injects per-currency default curves into bond measure queries.
#[derive(Debug, Clone)]
pub struct DefaultCurvePropertyFunction {
    defaults: Arc<DefaultCurveConfig>,
    value_names: Vec<String>,
}

impl DefaultCurvePropertyFunction {
    /// Applies to every standard bond measure.
    pub fn new(defaults: Arc<DefaultCurveConfig>) -> Self {
        Self::for_values(defaults, value_names::BOND_MEASURES)
    }

    /// Applies to the given value names only.
    pub fn for_values<I, S>(defaults: Arc<DefaultCurveConfig>, value_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            defaults,
            value_names: value_names.into_iter().map(Into::into).collect(),
        }
    }

    /// The defaults table.
    #[must_use]
    pub fn defaults(&self) -> &DefaultCurveConfig {
        &self.defaults
    }

    fn needs_value(constraints: &PropertyConstraintSet, property: &str) -> bool {
        constraints
            .values_for(property)
            .map_or(true, PropertyValues::is_any)
    }
}

impl PropertyInjector for DefaultCurvePropertyFunction {
    fn id(&self) -> &str {
        "DefaultCurveProperties"
    }

    fn inject(&self, target: &CalculationTarget, query: &ValueQuery) -> Option<ValueQuery> {
        if !self.value_names.iter().any(|n| n == query.value_name()) {
            return None;
        }
        let security = target.security()?;
        let defaults = self.defaults.for_currency(security.currency)?;

        let candidates = [
            (RISK_FREE_CURVE, &defaults.risk_free_curve),
            (RISK_FREE_CURVE_CONFIG, &defaults.risk_free_config),
            (CREDIT_CURVE, &defaults.credit_curve),
            (CREDIT_CURVE_CONFIG, &defaults.credit_config),
        ];
        let missing: Vec<_> = candidates
            .into_iter()
            .filter(|(property, _)| Self::needs_value(query.constraints(), property))
            .collect();
        if missing.is_empty() {
            return None;
        }

        let constraints = missing
            .iter()
            .fold(query.constraints().clone(), |set, (property, value)| {
                set.with(*property, value.as_str())
            });
        debug!(
            currency = %security.currency,
            injected = missing.len(),
            "Injected default curves into {}",
            query
        );
        Some(query.with_constraints(constraints))
    }
}
