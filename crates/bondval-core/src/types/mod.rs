//! Domain types the resolution engine reads from.
//!
//! - [`Currency`]: ISO currency codes
//! - [`CalculationTarget`]: bond security, bond trade or currency
//! - [`TargetRef`]: the lightweight reference carried by queries and descriptors

mod currency;
mod target;

pub use currency::Currency;
pub use target::{BondSecurity, BondTrade, CalculationTarget, TargetKind, TargetRef};
