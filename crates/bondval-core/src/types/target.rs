//! Calculation targets.
//!
//! A [`CalculationTarget`] is the domain object a value is computed for. The
//! engine only reads from it; queries and descriptors carry the lighter
//! [`TargetRef`] so they stay cheap to clone and compare.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Currency;
use crate::error::CoreError;

/// The kind of object a target refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetKind {
    /// A bond security.
    Security,
    /// A trade in a bond security.
    Trade,
    /// A currency (yield curves live here).
    Currency,
}

impl TargetKind {
    /// Stable upper-case tag used in the textual form of a [`TargetRef`].
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Security => "SECURITY",
            TargetKind::Trade => "TRADE",
            TargetKind::Currency => "CURRENCY",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a calculation target: kind plus identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TargetRef {
    /// Target kind.
    pub kind: TargetKind,
    /// Identifier within the kind (security id, trade id, ISO code).
    pub id: String,
}

impl TargetRef {
    /// Creates a reference to a bond security.
    pub fn security(id: impl Into<String>) -> Self {
        Self {
            kind: TargetKind::Security,
            id: id.into(),
        }
    }

    /// Creates a reference to a bond trade.
    pub fn trade(id: impl Into<String>) -> Self {
        Self {
            kind: TargetKind::Trade,
            id: id.into(),
        }
    }

    /// Creates a reference to a currency.
    pub fn currency(currency: Currency) -> Self {
        Self {
            kind: TargetKind::Currency,
            id: currency.code().to_string(),
        }
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}~{}", self.kind, self.id)
    }
}

impl FromStr for TargetRef {
    type Err = CoreError;

    /// Parses `KIND~id`, e.g. `SECURITY~US912828Z229` or `CURRENCY~USD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s
            .split_once('~')
            .ok_or_else(|| CoreError::InvalidTarget(s.to_string()))?;
        if id.is_empty() {
            return Err(CoreError::InvalidTarget(s.to_string()));
        }
        match kind.to_ascii_uppercase().as_str() {
            "SECURITY" => Ok(Self::security(id)),
            "TRADE" => Ok(Self::trade(id)),
            "CURRENCY" => Ok(Self::currency(id.parse()?)),
            _ => Err(CoreError::InvalidTarget(s.to_string())),
        }
    }
}

/// A fixed-coupon bond security as seen by the resolution engine.
///
/// Only the fields the engine or its collaborators read are modelled; the
/// pricing library receives the whole struct when building a derivative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondSecurity {
    /// Security identifier (ISIN, CUSIP or internal id).
    pub id: String,
    /// Currency of the bond's cash flows.
    pub currency: Currency,
    /// Issuer name.
    pub issuer_name: String,
    /// Issuer domicile (ISO country code).
    pub issuer_domicile: String,
    /// Issuer type (sovereign, corporate, ...), if known.
    #[serde(default)]
    pub issuer_type: Option<String>,
    /// Annual coupon rate as a decimal (0.05 = 5%).
    pub coupon_rate: f64,
    /// Coupons per year.
    #[serde(default = "default_frequency")]
    pub coupon_frequency: u32,
    /// Day count convention name, passed through to the pricing library.
    #[serde(default = "default_day_count")]
    pub day_count: String,
    /// First accrual date.
    pub issue_date: NaiveDate,
    /// Final maturity.
    pub maturity_date: NaiveDate,
}

fn default_frequency() -> u32 {
    2
}

fn default_day_count() -> String {
    "30/360".to_string()
}

/// A trade in a bond security.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondTrade {
    /// Trade identifier.
    pub id: String,
    /// The traded security.
    pub security: BondSecurity,
    /// Face amount traded.
    pub quantity: f64,
    /// Trade date.
    pub trade_date: NaiveDate,
}

/// The domain object a value is computed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CalculationTarget {
    /// A bond security.
    Security(BondSecurity),
    /// A bond trade.
    Trade(BondTrade),
    /// A currency.
    Currency {
        /// The currency.
        currency: Currency,
    },
}

impl CalculationTarget {
    /// Returns the target kind.
    #[must_use]
    pub fn kind(&self) -> TargetKind {
        match self {
            CalculationTarget::Security(_) => TargetKind::Security,
            CalculationTarget::Trade(_) => TargetKind::Trade,
            CalculationTarget::Currency { .. } => TargetKind::Currency,
        }
    }

    /// Returns the reference used in queries and descriptors.
    #[must_use]
    pub fn reference(&self) -> TargetRef {
        match self {
            CalculationTarget::Security(s) => TargetRef::security(&s.id),
            CalculationTarget::Trade(t) => TargetRef::trade(&t.id),
            CalculationTarget::Currency { currency } => TargetRef::currency(*currency),
        }
    }

    /// Returns the currency the target is denominated in.
    #[must_use]
    pub fn currency(&self) -> Currency {
        match self {
            CalculationTarget::Security(s) => s.currency,
            CalculationTarget::Trade(t) => t.security.currency,
            CalculationTarget::Currency { currency } => *currency,
        }
    }

    /// Returns the bond security behind the target, if there is one.
    #[must_use]
    pub fn security(&self) -> Option<&BondSecurity> {
        match self {
            CalculationTarget::Security(s) => Some(s),
            CalculationTarget::Trade(t) => Some(&t.security),
            CalculationTarget::Currency { .. } => None,
        }
    }

    /// Returns the issuer domicile for bond targets.
    #[must_use]
    pub fn issuer_domicile(&self) -> Option<&str> {
        self.security().map(|s| s.issuer_domicile.as_str())
    }
}

impl From<BondSecurity> for CalculationTarget {
    fn from(security: BondSecurity) -> Self {
        CalculationTarget::Security(security)
    }
}

impl From<BondTrade> for CalculationTarget {
    fn from(trade: BondTrade) -> Self {
        CalculationTarget::Trade(trade)
    }
}

impl From<Currency> for CalculationTarget {
    fn from(currency: Currency) -> Self {
        CalculationTarget::Currency { currency }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bond() -> BondSecurity {
        BondSecurity {
            id: "US912828Z229".into(),
            currency: Currency::USD,
            issuer_name: "US TREASURY N/B".into(),
            issuer_domicile: "US".into(),
            issuer_type: Some("Sovereign".into()),
            coupon_rate: 0.015,
            coupon_frequency: 2,
            day_count: "ACT/ACT ICMA".into(),
            issue_date: NaiveDate::from_ymd_opt(2020, 2, 15).unwrap(),
            maturity_date: NaiveDate::from_ymd_opt(2030, 2, 15).unwrap(),
        }
    }

    #[test]
    fn test_target_ref_roundtrip() {
        let r = TargetRef::security("US912828Z229");
        assert_eq!(r.to_string(), "SECURITY~US912828Z229");
        assert_eq!("SECURITY~US912828Z229".parse::<TargetRef>().unwrap(), r);
        assert_eq!(
            "currency~usd".parse::<TargetRef>().unwrap(),
            TargetRef::currency(Currency::USD)
        );
    }

    #[test]
    fn test_target_ref_parse_errors() {
        assert!("SECURITY".parse::<TargetRef>().is_err());
        assert!("SECURITY~".parse::<TargetRef>().is_err());
        assert!("SWAP~X".parse::<TargetRef>().is_err());
        assert!("CURRENCY~XYZ".parse::<TargetRef>().is_err());
    }

    #[test]
    fn test_trade_reads_through_to_security() {
        let trade = BondTrade {
            id: "T-1".into(),
            security: sample_bond(),
            quantity: 1_000_000.0,
            trade_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        };
        let target = CalculationTarget::from(trade);
        assert_eq!(target.kind(), TargetKind::Trade);
        assert_eq!(target.reference(), TargetRef::trade("T-1"));
        assert_eq!(target.currency(), Currency::USD);
        assert_eq!(target.issuer_domicile(), Some("US"));
        assert_eq!(target.security().unwrap().id, "US912828Z229");
    }

    #[test]
    fn test_currency_target() {
        let target = CalculationTarget::from(Currency::GBP);
        assert_eq!(target.reference().to_string(), "CURRENCY~GBP");
        assert!(target.security().is_none());
    }
}
