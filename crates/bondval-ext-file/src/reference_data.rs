//! File-based reference data.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};

use bondval_core::prelude::*;
use bondval_traits::{TraitError, TraitResult};

// =============================================================================
// CSV BOND SOURCE
// =============================================================================

/// CSV record for bonds.
#[derive(Debug, Deserialize)]
struct BondRecord {
    security_id: String,
    currency: Currency,
    issuer_name: String,
    issuer_domicile: String,
    issuer_type: Option<String>,
    coupon_rate: f64,
    frequency: Option<u32>,
    day_count: Option<String>,
    issue_date: NaiveDate,
    maturity_date: NaiveDate,
}

impl BondRecord {
    fn into_security(self) -> TraitResult<BondSecurity> {
        if self.maturity_date <= self.issue_date {
            return Err(TraitError::InvalidInput(format!(
                "bond '{}' matures on or before its issue date",
                self.security_id
            )));
        }
        Ok(BondSecurity {
            id: self.security_id,
            currency: self.currency,
            issuer_name: self.issuer_name,
            issuer_domicile: self.issuer_domicile,
            issuer_type: self.issuer_type.filter(|t| !t.is_empty()),
            coupon_rate: self.coupon_rate,
            coupon_frequency: self.frequency.unwrap_or(2),
            day_count: self.day_count.unwrap_or_else(|| "30/360".to_string()),
            issue_date: self.issue_date,
            maturity_date: self.maturity_date,
        })
    }
}

/// Bond securities loaded from CSV.
///
/// Columns: `security_id,currency,issuer_name,issuer_domicile,issuer_type,
/// coupon_rate,frequency,day_count,issue_date,maturity_date`. Coupon rates
/// are decimals; dates are ISO 8601.
#[derive(Debug, Clone, Default)]
pub struct CsvBondSource {
    bonds: BTreeMap<String, BondSecurity>,
}

impl CsvBondSource {
    /// Loads bonds from a CSV file. A missing file gives an empty source.
    pub fn new(file_path: impl AsRef<Path>) -> TraitResult<Self> {
        let path = file_path.as_ref();
        let mut source = Self::default();
        if !path.exists() {
            warn!(path = %path.display(), "Bond file not found, no bonds loaded");
            return Ok(source);
        }

        let mut reader =
            csv::Reader::from_path(path).map_err(|e| TraitError::IoError(e.to_string()))?;
        for result in reader.deserialize() {
            let record: BondRecord = result.map_err(|e| TraitError::ParseError(e.to_string()))?;
            let bond = record.into_security()?;
            source.bonds.insert(bond.id.clone(), bond);
        }
        debug!(path = %path.display(), count = source.bonds.len(), "Loaded bonds");
        Ok(source)
    }

    /// Builds a source from securities already in memory.
    pub fn from_securities(securities: impl IntoIterator<Item = BondSecurity>) -> Self {
        Self {
            bonds: securities.into_iter().map(|b| (b.id.clone(), b)).collect(),
        }
    }

    /// Looks a bond up by security id.
    #[must_use]
    pub fn get(&self, security_id: &str) -> Option<&BondSecurity> {
        self.bonds.get(security_id)
    }

    /// Looks a bond up, failing with `NotFound`.
    pub fn require(&self, security_id: &str) -> TraitResult<&BondSecurity> {
        self.get(security_id)
            .ok_or_else(|| TraitError::NotFound(format!("bond '{}'", security_id)))
    }

    /// All bonds, ordered by security id.
    pub fn securities(&self) -> impl Iterator<Item = &BondSecurity> {
        self.bonds.values()
    }

    /// Number of bonds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bonds.len()
    }

    /// True when no bond is loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }
}
