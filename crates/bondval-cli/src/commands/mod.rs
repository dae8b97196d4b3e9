//! CLI command implementations.

pub mod defaults;
pub mod functions;
pub mod plan;

// Re-export submodules for convenience
pub use defaults::DefaultsArgs;
pub use functions::FunctionsArgs;
pub use plan::PlanArgs;

use std::path::Path;

use anyhow::{Context, Result};

use bondval_config::BondvalConfig;
use bondval_core::{Currency, PropertyConstraintSet};

use crate::error::{CliError, CliResult};

/// Loads the configuration file, or the built-in table when none is given.
pub fn load_config(path: Option<&Path>) -> Result<BondvalConfig> {
    match path {
        Some(path) => BondvalConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => Ok(BondvalConfig::standard()),
    }
}

/// Parses an ISO currency code, case-insensitively.
pub fn parse_currency(code: &str) -> CliResult<Currency> {
    Currency::from_code(&code.to_ascii_uppercase())
        .ok_or_else(|| CliError::UnknownCurrency(code.to_string()))
}

/// Adds one `NAME=VALUE`, `NAME=V1,V2` or `NAME=*` argument to a constraint set.
pub fn parse_property(set: PropertyConstraintSet, arg: &str) -> CliResult<PropertyConstraintSet> {
    let invalid = || CliError::InvalidProperty(arg.to_string());
    let (name, values) = arg.split_once('=').ok_or_else(invalid)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid());
    }
    if values.trim() == "*" {
        return Ok(set.with_any(name));
    }
    let values: Vec<&str> = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect();
    match values.as_slice() {
        [] => Err(invalid()),
        [single] => Ok(set.with(name, *single)),
        _ => set.with_values(name, values).map_err(|_| invalid()),
    }
}
