//! Default curve configuration.
//!
//! Maps a currency to the risk-free and credit curves (and their calculation
//! configurations) used when a caller leaves them unspecified.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use bondval_core::Currency;

use crate::error::{Validate, ValidationError};

// =============================================================================
// CURVE DEFAULTS
// =============================================================================

/// Default curves for one currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveDefaults {
    /// Risk-free (discounting) curve name.
    pub risk_free_curve: String,
    /// Risk-free curve calculation configuration.
    pub risk_free_config: String,
    /// Credit (issuer) curve name.
    pub credit_curve: String,
    /// Credit curve calculation configuration.
    pub credit_config: String,
}

impl CurveDefaults {
    /// Creates defaults with distinct risk-free and credit curves.
    pub fn new(
        risk_free_curve: impl Into<String>,
        risk_free_config: impl Into<String>,
        credit_curve: impl Into<String>,
        credit_config: impl Into<String>,
    ) -> Self {
        Self {
            risk_free_curve: risk_free_curve.into(),
            risk_free_config: risk_free_config.into(),
            credit_curve: credit_curve.into(),
            credit_config: credit_config.into(),
        }
    }

    /// Creates defaults where one curve serves both roles.
    pub fn shared(curve: impl Into<String>, config: impl Into<String>) -> Self {
        let curve = curve.into();
        let config = config.into();
        Self::new(curve.clone(), config.clone(), curve, config)
    }

    /// True when both roles use the same curve and configuration.
    #[must_use]
    pub fn is_shared(&self) -> bool {
        self.risk_free_curve == self.credit_curve && self.risk_free_config == self.credit_config
    }
}

impl Validate for CurveDefaults {
    fn validate(&self) -> Vec<ValidationError> {
        [
            ("risk_free_curve", &self.risk_free_curve),
            ("risk_free_config", &self.risk_free_config),
            ("credit_curve", &self.credit_curve),
            ("credit_config", &self.credit_config),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| ValidationError::with_rule(field, "Name cannot be blank", "non_blank"))
        .collect()
    }
}

/// A table entry: a currency and its defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyCurveDefaults {
    /// The currency.
    pub currency: Currency,
    /// Its defaults.
    #[serde(flatten)]
    pub defaults: CurveDefaults,
}

// =============================================================================
// DEFAULT CURVE CONFIG
// =============================================================================

/// Currency to default-curve table.
///
/// Built once and shared read-only. Lookups scan a short list; the table
/// holds one entry per configured currency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultCurveConfig {
    /// Entries in declaration order.
    #[serde(default)]
    pub currencies: Vec<CurrencyCurveDefaults>,
}

impl DefaultCurveConfig {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard two-curve defaults for the major currencies.
    #[must_use]
    pub fn standard() -> Self {
        [Currency::USD, Currency::EUR, Currency::GBP, Currency::JPY]
            .into_iter()
            .fold(Self::new(), |config, ccy| {
                config.with(
                    ccy,
                    CurveDefaults::shared(
                        "Discounting",
                        format!("DefaultTwoCurve{}Config", ccy.code()),
                    ),
                )
            })
    }

    /// Adds or replaces the entry for a currency.
    #[must_use]
    pub fn with(mut self, currency: Currency, defaults: CurveDefaults) -> Self {
        match self.currencies.iter_mut().find(|e| e.currency == currency) {
            Some(entry) => entry.defaults = defaults,
            None => self.currencies.push(CurrencyCurveDefaults { currency, defaults }),
        }
        self
    }

    /// Looks up the defaults for a currency.
    #[must_use]
    pub fn for_currency(&self, currency: Currency) -> Option<&CurveDefaults> {
        self.currencies
            .iter()
            .find(|e| e.currency == currency)
            .map(|e| &e.defaults)
    }

    /// Configured currencies in declaration order.
    pub fn currencies(&self) -> impl Iterator<Item = Currency> + '_ {
        self.currencies.iter().map(|e| e.currency)
    }

    /// Number of configured currencies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    /// True when no currency is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }
}

impl Validate for DefaultCurveConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let mut seen = BTreeSet::new();

        for (i, entry) in self.currencies.iter().enumerate() {
            let prefix = format!("currencies[{}]", i);
            if !seen.insert(entry.currency) {
                errors.push(ValidationError::with_rule(
                    format!("{}.currency", prefix),
                    format!("Duplicate entry for {}", entry.currency),
                    "unique_currency",
                ));
            }
            errors.extend(
                entry
                    .defaults
                    .validate()
                    .into_iter()
                    .map(|e| e.nested(&prefix)),
            );
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_usd() {
        let config = DefaultCurveConfig::standard();
        let usd = config.for_currency(Currency::USD).unwrap();
        assert_eq!(usd.risk_free_curve, "Discounting");
        assert_eq!(usd.risk_free_config, "DefaultTwoCurveUSDConfig");
        assert_eq!(usd.credit_curve, "Discounting");
        assert_eq!(usd.credit_config, "DefaultTwoCurveUSDConfig");
        assert!(usd.is_shared());
        assert!(config.is_valid());
    }

    #[test]
    fn test_standard_coverage() {
        let config = DefaultCurveConfig::standard();
        let ccys: Vec<_> = config.currencies().collect();
        assert_eq!(
            ccys,
            vec![Currency::USD, Currency::EUR, Currency::GBP, Currency::JPY]
        );
        assert!(config.for_currency(Currency::CHF).is_none());
    }

    #[test]
    fn test_with_replaces() {
        let config = DefaultCurveConfig::standard().with(
            Currency::USD,
            CurveDefaults::new("OIS", "OISConfig", "USDCorp", "CorpConfig"),
        );
        assert_eq!(config.len(), 4);
        let usd = config.for_currency(Currency::USD).unwrap();
        assert_eq!(usd.credit_curve, "USDCorp");
        assert!(!usd.is_shared());
    }

    #[test]
    fn test_validation_blank_and_duplicate() {
        let mut config = DefaultCurveConfig::new()
            .with(Currency::USD, CurveDefaults::shared("Discounting", " "));
        config.currencies.push(CurrencyCurveDefaults {
            currency: Currency::USD,
            defaults: CurveDefaults::shared("Discounting", "Cfg"),
        });

        let errors = config.validate();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"currencies[0].risk_free_config"));
        assert!(fields.contains(&"currencies[0].credit_config"));
        assert!(fields.contains(&"currencies[1].currency"));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_serde_flattened_entry() {
        let json = serde_json::json!({
            "currencies": [{
                "currency": "EUR",
                "risk_free_curve": "ESTR",
                "risk_free_config": "EUROIS",
                "credit_curve": "EURCorp",
                "credit_config": "EURCorpConfig"
            }]
        });
        let config: DefaultCurveConfig = serde_json::from_value(json).unwrap();
        assert_eq!(
            config.for_currency(Currency::EUR).unwrap().credit_curve,
            "EURCorp"
        );
    }
}
