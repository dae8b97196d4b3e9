//! Defaults command implementation.
//!
//! Shows the curves injected into bond queries that name none.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use bondval_config::{BondvalConfig, CurveDefaults};
use bondval_core::Currency;

use crate::cli::OutputFormat;
use crate::commands::parse_currency;
use crate::output::{print_output, Minimal};

/// Arguments for the defaults command.
#[derive(Args, Debug)]
pub struct DefaultsArgs {
    /// Only this currency (ISO code)
    #[arg(long)]
    pub currency: Option<String>,
}

/// Defaults for one currency.
#[derive(Debug, Serialize, Tabled)]
pub struct DefaultsRow {
    #[tabled(rename = "Currency")]
    pub currency: String,
    #[tabled(rename = "Risk-Free Curve")]
    pub risk_free_curve: String,
    #[tabled(rename = "Risk-Free Config")]
    pub risk_free_config: String,
    #[tabled(rename = "Credit Curve")]
    pub credit_curve: String,
    #[tabled(rename = "Credit Config")]
    pub credit_config: String,
    #[tabled(rename = "Shared")]
    pub shared: bool,
}

impl DefaultsRow {
    fn new(currency: Currency, defaults: &CurveDefaults) -> Self {
        Self {
            currency: currency.code().to_string(),
            risk_free_curve: defaults.risk_free_curve.clone(),
            risk_free_config: defaults.risk_free_config.clone(),
            credit_curve: defaults.credit_curve.clone(),
            credit_config: defaults.credit_config.clone(),
            shared: defaults.is_shared(),
        }
    }
}

impl Minimal for DefaultsRow {
    fn minimal(&self) -> String {
        self.currency.clone()
    }
}

/// Execute the defaults command.
pub fn execute(args: DefaultsArgs, format: OutputFormat, config: &BondvalConfig) -> Result<()> {
    let table = &config.default_curves;
    let rows: Vec<DefaultsRow> = match args.currency.as_deref() {
        Some(code) => {
            let currency = parse_currency(code)?;
            let defaults = table
                .for_currency(currency)
                .ok_or_else(|| anyhow::anyhow!("No default curves configured for {}", currency))?;
            vec![DefaultsRow::new(currency, defaults)]
        }
        None => table
            .currencies()
            .filter_map(|ccy| table.for_currency(ccy).map(|d| DefaultsRow::new(ccy, d)))
            .collect(),
    };
    print_output(&rows, format)
}
