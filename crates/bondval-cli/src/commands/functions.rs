//! Functions command implementation.
//!
//! Lists the standard bond functions, in the order the resolver would try
//! them.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use bondval_engine::{standard_bond_functions, BondFunction, ComputationFunction};

use crate::cli::OutputFormat;
use crate::output::{print_output, Minimal};

/// Arguments for the functions command.
#[derive(Args, Debug)]
pub struct FunctionsArgs {
    /// Only functions producing this value (e.g. "Clean Price")
    #[arg(short = 'n', long = "value")]
    pub value_name: Option<String>,
}

/// One function.
#[derive(Debug, Serialize, Tabled)]
pub struct FunctionRow {
    #[tabled(rename = "Function")]
    pub id: String,
    #[tabled(rename = "Value")]
    pub value_name: String,
    #[tabled(rename = "Method")]
    pub method: String,
    #[tabled(rename = "Curves")]
    pub curves: String,
    #[tabled(rename = "Calculator")]
    pub calculator: String,
    #[tabled(rename = "Priority")]
    pub priority: i32,
    #[tabled(rename = "Scale")]
    pub scale: f64,
}

impl From<&BondFunction> for FunctionRow {
    fn from(f: &BondFunction) -> Self {
        Self {
            id: f.id().to_string(),
            value_name: f.value_name().to_string(),
            method: f.source().calculation_method().to_string(),
            curves: f
                .source()
                .curve_layout()
                .map_or_else(|| "-".to_string(), |l| l.to_string()),
            calculator: f.calculator().to_string(),
            priority: f.priority(),
            scale: f.scale().factor(),
        }
    }
}

impl Minimal for FunctionRow {
    fn minimal(&self) -> String {
        self.id.clone()
    }
}

/// Execute the functions command.
pub fn execute(args: FunctionsArgs, format: OutputFormat) -> Result<()> {
    let mut functions: Vec<BondFunction> = standard_bond_functions()
        .into_iter()
        .filter(|f| {
            args.value_name
                .as_deref()
                .map_or(true, |name| f.value_name().eq_ignore_ascii_case(name))
        })
        .collect();
    // Stable: ties stay in registration order.
    functions.sort_by_key(|f| std::cmp::Reverse(f.priority()));

    let rows: Vec<FunctionRow> = functions.iter().map(FunctionRow::from).collect();
    print_output(&rows, format)
}
