//! Loading configuration files.
//!
//! The format is chosen by extension: `.toml` or `.json`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::curves::DefaultCurveConfig;
use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};
use crate::resolver::ResolverConfig;

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML.
    Toml,
    /// JSON.
    Json,
}

impl ConfigFormat {
    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Everything a `bondval` configuration file can hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondvalConfig {
    /// Resolver settings.
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Default curves per currency. When the file has no entries the
    /// standard table is used.
    #[serde(default)]
    pub default_curves: DefaultCurveConfig,
}

impl BondvalConfig {
    /// Standard defaults with default resolver settings.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            resolver: ResolverConfig::default(),
            default_curves: DefaultCurveConfig::standard(),
        }
    }

    /// Parses and validates a configuration from text.
    pub fn parse(text: &str, format: ConfigFormat) -> ConfigResult<Self> {
        let mut config: BondvalConfig = match format {
            ConfigFormat::Toml => toml::from_str(text)?,
            ConfigFormat::Json => serde_json::from_str(text)?,
        };
        if config.default_curves.is_empty() {
            config.default_curves = DefaultCurveConfig::standard();
        }
        config.validate_or_error()?;
        Ok(config)
    }

    /// Loads and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        if !path.exists() {
            return Err(ConfigError::NotFound {
                key: path.display().to_string(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, format)
    }

    /// Renders the configuration in the given format.
    pub fn render(&self, format: ConfigFormat) -> ConfigResult<String> {
        match format {
            ConfigFormat::Toml => Ok(toml::to_string_pretty(self)?),
            ConfigFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Validate for BondvalConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors: Vec<_> = self
            .resolver
            .validate()
            .into_iter()
            .map(|e| e.nested("resolver"))
            .collect();
        errors.extend(
            self.default_curves
                .validate()
                .into_iter()
                .map(|e| e.nested("default_curves")),
        );
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bondval_core::Currency;
    use std::io::Write;

    const SAMPLE_TOML: &str = r#"
[resolver]
valuation_date = "2024-06-28"
fallback_to_original_query = false

[[default_curves.currencies]]
currency = "USD"
risk_free_curve = "SOFR"
risk_free_config = "SOFRConfig"
credit_curve = "USDCorp"
credit_config = "USDCorpConfig"
"#;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("a/b.TOML")).unwrap(),
            ConfigFormat::Toml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("b.json")).unwrap(),
            ConfigFormat::Json
        );
        assert!(ConfigFormat::from_path(Path::new("b.yaml")).is_err());
        assert!(ConfigFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_load_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(SAMPLE_TOML.as_bytes()).unwrap();

        let config = BondvalConfig::load(file.path()).unwrap();
        assert!(!config.resolver.fallback_to_original_query);
        let usd = config.default_curves.for_currency(Currency::USD).unwrap();
        assert_eq!(usd.risk_free_curve, "SOFR");
        assert_eq!(usd.credit_curve, "USDCorp");
        assert!(config.default_curves.for_currency(Currency::EUR).is_none());
    }

    #[test]
    fn test_empty_file_uses_standard_table() {
        let config = BondvalConfig::parse("", ConfigFormat::Toml).unwrap();
        assert_eq!(config, BondvalConfig::standard());
    }

    #[test]
    fn test_json_roundtrip_through_render() {
        let standard = BondvalConfig::standard();
        let text = standard.render(ConfigFormat::Json).unwrap();
        assert_eq!(BondvalConfig::parse(&text, ConfigFormat::Json).unwrap(), standard);
    }

    #[test]
    fn test_invalid_file_rejected() {
        let text = r#"{"default_curves": {"currencies": [
            {"currency": "USD", "risk_free_curve": "", "risk_free_config": "C",
             "credit_curve": "D", "credit_config": "C"}
        ]}}"#;
        let err = BondvalConfig::parse(text, ConfigFormat::Json).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation { ref field, .. }
                if field == "default_curves.currencies[0].risk_free_curve"
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = BondvalConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_unknown_currency_rejected() {
        let text = r#"{"default_curves": {"currencies": [
            {"currency": "XYZ", "risk_free_curve": "A", "risk_free_config": "B",
             "credit_curve": "A", "credit_config": "B"}
        ]}}"#;
        assert!(matches!(
            BondvalConfig::parse(text, ConfigFormat::Json),
            Err(ConfigError::Deserialization(_))
        ));
    }
}
