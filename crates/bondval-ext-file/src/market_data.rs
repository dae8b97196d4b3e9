//! File-based market data.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use bondval_core::prelude::*;
use bondval_core::value::property_names::{CURVE, CURVE_CALCULATION_CONFIG};
use bondval_traits::{
    MarketDataProvider, MarketValue, SourceType, TraitError, TraitResult, YieldCurveData,
};

/// Curves are keyed by currency, name and calculation configuration.
type CurveKey = (Currency, String, String);

// =============================================================================
// FILE RECORDS
// =============================================================================

/// JSON record for one curve.
#[derive(Debug, Deserialize)]
struct CurveRecord {
    name: String,
    currency: Currency,
    #[serde(alias = "calculation_config")]
    config: String,
    tenors: Vec<f64>,
    rates: Vec<f64>,
}

/// CSV record for quotes. Either column may be blank.
#[derive(Debug, Deserialize)]
struct QuoteRecord {
    security_id: String,
    clean_price: Option<f64>,
    #[serde(rename = "yield")]
    yield_to_maturity: Option<f64>,
}

// =============================================================================
// JSON MARKET DATA
// =============================================================================

/// Market data loaded from a JSON curve file and a CSV quote file.
///
/// Curves are published as `YieldCurve` values on `CURRENCY~<ccy>` with
/// `Curve` and `CurveCalculationConfig` properties. Quotes are published as
/// `Market Clean Price` and `Market Yield To Maturity` on
/// `SECURITY~<id>`, in percent.
#[derive(Debug, Clone, Default)]
pub struct JsonMarketData {
    curves: BTreeMap<CurveKey, YieldCurveData>,
    clean_prices: HashMap<String, f64>,
    yields: HashMap<String, f64>,
}

impl JsonMarketData {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads curves and quotes. A missing file leaves that part empty.
    pub fn from_files(
        curves_json: impl AsRef<Path>,
        quotes_csv: impl AsRef<Path>,
    ) -> TraitResult<Self> {
        let mut source = Self::new();
        source.load_curves(curves_json)?;
        source.load_quotes(quotes_csv)?;
        Ok(source)
    }

    /// Adds an in-memory curve.
    pub fn with_curve(mut self, config: impl Into<String>, curve: YieldCurveData) -> Self {
        self.insert_curve(config.into(), curve);
        self
    }

    /// Adds a quoted clean price, in percent of par.
    pub fn with_clean_price(mut self, security_id: impl Into<String>, price: f64) -> Self {
        self.clean_prices.insert(security_id.into(), price);
        self
    }

    /// Adds a quoted yield, in percent.
    pub fn with_yield(mut self, security_id: impl Into<String>, ytm: f64) -> Self {
        self.yields.insert(security_id.into(), ytm);
        self
    }

    /// Loads curves from a JSON array of curve records.
    pub fn load_curves(&mut self, path: impl AsRef<Path>) -> TraitResult<usize> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "Curve file not found, no curves loaded");
            return Ok(0);
        }

        let content = std::fs::read_to_string(path)?;
        let records: Vec<CurveRecord> =
            serde_json::from_str(&content).map_err(|e| TraitError::ParseError(e.to_string()))?;

        let count = records.len();
        for record in records {
            let curve =
                YieldCurveData::new(record.name, record.currency, record.tenors, record.rates)?;
            self.insert_curve(record.config, curve);
        }
        debug!(path = %path.display(), count, "Loaded curves");
        Ok(count)
    }

    /// Loads quotes from CSV with columns `security_id,clean_price,yield`.
    pub fn load_quotes(&mut self, path: impl AsRef<Path>) -> TraitResult<usize> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "Quote file not found, no quotes loaded");
            return Ok(0);
        }

        let mut reader =
            csv::Reader::from_path(path).map_err(|e| TraitError::IoError(e.to_string()))?;

        let mut count = 0;
        for result in reader.deserialize() {
            let record: QuoteRecord = result.map_err(|e| TraitError::ParseError(e.to_string()))?;
            if let Some(price) = record.clean_price {
                self.clean_prices.insert(record.security_id.clone(), price);
            }
            if let Some(ytm) = record.yield_to_maturity {
                self.yields.insert(record.security_id, ytm);
            }
            count += 1;
        }
        debug!(path = %path.display(), count, "Loaded quotes");
        Ok(count)
    }

    /// Number of curves.
    #[must_use]
    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }

    /// Number of securities with at least one quote.
    #[must_use]
    pub fn quoted_securities(&self) -> usize {
        let mut ids: Vec<&String> = self.clean_prices.keys().chain(self.yields.keys()).collect();
        ids.sort();
        ids.dedup();
        ids.len()
    }

    fn insert_curve(&mut self, config: String, curve: YieldCurveData) {
        let key = (curve.currency, curve.name.clone(), config);
        self.curves.insert(key, curve);
    }

    fn curve_descriptor(key: &CurveKey) -> TraitResult<ValueDescriptor> {
        let (currency, name, config) = key;
        ValueDescriptor::new(
            value_names::YIELD_CURVE,
            TargetRef::currency(*currency),
            PropertyConstraintSet::new()
                .with(CURVE, name.as_str())
                .with(CURVE_CALCULATION_CONFIG, config.as_str()),
        )
        .map_err(|e| TraitError::Internal(e.to_string()))
    }

    fn quote_descriptor(query: &ValueQuery) -> TraitResult<ValueDescriptor> {
        ValueDescriptor::new(
            query.value_name(),
            query.target().clone(),
            PropertyConstraintSet::new(),
        )
        .map_err(|e| TraitError::Internal(e.to_string()))
    }

    fn resolve_curve(&self, query: &ValueQuery) -> TraitResult<Option<ValueDescriptor>> {
        let Some(currency) = Currency::from_code(&query.target().id) else {
            return Ok(None);
        };
        for key in self.curves.keys().filter(|(ccy, _, _)| *ccy == currency) {
            let descriptor = Self::curve_descriptor(key)?;
            if query.is_satisfied_by(&descriptor) {
                return Ok(Some(descriptor));
            }
        }
        Ok(None)
    }

    fn quote(&self, value_name: &str, security_id: &str) -> Option<MarketValue> {
        match value_name {
            value_names::MARKET_CLEAN_PRICE => {
                self.clean_prices.get(security_id).copied().map(MarketValue::Price)
            }
            value_names::MARKET_YTM => self.yields.get(security_id).copied().map(MarketValue::Yield),
            _ => None,
        }
    }
}

impl MarketDataProvider for JsonMarketData {
    fn source_type(&self) -> SourceType {
        SourceType::File
    }

    fn resolve(&self, query: &ValueQuery) -> TraitResult<Option<ValueDescriptor>> {
        let target = query.target();
        let found = match (query.value_name(), target.kind) {
            (value_names::YIELD_CURVE, TargetKind::Currency) => self.resolve_curve(query)?,
            (name, TargetKind::Security) if self.quote(name, &target.id).is_some() => {
                Some(Self::quote_descriptor(query)?).filter(|d| query.is_satisfied_by(d))
            }
            _ => None,
        };
        if found.is_none() {
            debug!(query = %query, "No market data for query");
        }
        Ok(found)
    }

    fn value(&self, descriptor: &ValueDescriptor) -> TraitResult<Option<MarketValue>> {
        let target = descriptor.target();
        match (descriptor.value_name(), target.kind) {
            (value_names::YIELD_CURVE, TargetKind::Currency) => {
                let (Some(currency), Some(name), Some(config)) = (
                    Currency::from_code(&target.id),
                    descriptor.property(CURVE),
                    descriptor.property(CURVE_CALCULATION_CONFIG),
                ) else {
                    return Ok(None);
                };
                let key = (currency, name.to_string(), config.to_string());
                Ok(self.curves.get(&key).cloned().map(MarketValue::Curve))
            }
            (name, TargetKind::Security) => Ok(self.quote(name, &target.id)),
            _ => Ok(None),
        }
    }
}
