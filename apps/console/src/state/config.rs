//! # Console Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     KASIR_API_URL=https://admin.toko.id                                │
//! │     KASIR_API_TOKEN=…   KASIR_TAX_RATE=11   KASIR_TIMEOUT_SECS=15      │
//! │     KASIR_CURRENCY_SYMBOL=Rp                                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/kasir-pos/console.toml (Linux)                           │
//! │     ~/Library/Application Support/id.kasir.pos/console.toml (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:8000, 11% tax, Rupiah                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # console.toml
//! tax_rate_bps = 1100
//!
//! [backend]
//! url = "https://admin.toko.id"
//! token = "…"
//! timeout_secs = 15
//!
//! [currency]
//! symbol = "Rp"
//! space_after_symbol = true
//! decimals = 0
//! group_separator = "."
//! decimal_separator = ","
//! ```
//!
//! Read-only after initialization, so no mutex needed.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use kasir_api::HttpBackendConfig;
use kasir_core::types::{CurrencyFormat, TaxRate};
use kasir_core::DEFAULT_TAX_RATE_BPS;

/// Upper bound for the request timeout.
const MAX_TIMEOUT_SECS: u64 = 300;

/// Upper bound for the tax rate (100%).
const MAX_TAX_RATE_BPS: u32 = 10_000;

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Connection to the admin backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    pub url: String,
    /// Bearer token; `None` for unauthenticated development backends.
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        BackendSettings {
            url: "http://localhost:8000".to_string(),
            token: None,
            timeout_secs: 15,
        }
    }
}

/// Console configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub backend: BackendSettings,

    /// Regional sales tax in basis points, e.g. 1100 = 11%
    pub tax_rate_bps: u32,

    /// How amounts are shown to the cashier
    pub currency: CurrencyFormat,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        ConsoleConfig {
            backend: BackendSettings::default(),
            tax_rate_bps: DEFAULT_TAX_RATE_BPS,
            currency: CurrencyFormat::default(),
        }
    }
}

impl ConsoleConfig {
    /// Loads configuration: defaults, then file, then environment.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = match config_path.or_else(Self::default_config_path) {
            Some(path) if path.exists() => {
                info!(?path, "Loading console config from file");
                Self::from_file(&path)?
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a config file without applying overrides.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.url.trim().is_empty() {
            return Err(ConfigError::Invalid("backend.url must not be empty".into()));
        }

        if self.backend.timeout_secs == 0 || self.backend.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::Invalid(format!(
                "backend.timeout_secs must be between 1 and {}",
                MAX_TIMEOUT_SECS
            )));
        }

        if self.tax_rate_bps > MAX_TAX_RATE_BPS {
            return Err(ConfigError::Invalid(format!(
                "tax_rate_bps must be at most {}",
                MAX_TAX_RATE_BPS
            )));
        }

        if self.currency.decimals > 4 {
            return Err(ConfigError::Invalid(
                "currency.decimals must be at most 4".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `KASIR_*` overrides from `lookup`. Unparseable values are
    /// logged and skipped.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("KASIR_API_URL") {
            debug!(url = %url, "Overriding backend URL from environment");
            self.backend.url = url;
        }

        if let Some(token) = lookup("KASIR_API_TOKEN") {
            self.backend.token = Some(token);
        }

        if let Some(timeout) = lookup("KASIR_TIMEOUT_SECS") {
            match timeout.trim().parse::<u64>() {
                Ok(secs) => self.backend.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring invalid KASIR_TIMEOUT_SECS"),
            }
        }

        // Percentage, e.g. "11" or "11.5"
        if let Some(rate) = lookup("KASIR_TAX_RATE") {
            match rate.trim().parse::<f64>() {
                Ok(pct) if (0.0..=100.0).contains(&pct) => {
                    self.tax_rate_bps = TaxRate::from_percentage(pct).bps();
                }
                _ => warn!(value = %rate, "Ignoring invalid KASIR_TAX_RATE"),
            }
        }

        if let Some(symbol) = lookup("KASIR_CURRENCY_SYMBOL") {
            self.currency.symbol = symbol;
        }
    }

    /// Platform config path for `console.toml`.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("id", "kasir", "pos")
            .map(|dirs| dirs.config_dir().join("console.toml"))
    }

    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    /// Settings for [`kasir_api::HttpBackend`].
    pub fn backend_config(&self) -> HttpBackendConfig {
        HttpBackendConfig {
            base_url: self.backend.url.clone(),
            api_token: self.backend.token.clone(),
            timeout: Duration::from_secs(self.backend.timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ConsoleConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tax_rate().bps(), 1100);
        assert_eq!(config.currency.symbol, "Rp");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ConsoleConfig = toml::from_str(
            r#"
            [backend]
            url = "https://admin.toko.id"
            "#,
        )
        .unwrap();
        assert_eq!(config.backend.url, "https://admin.toko.id");
        assert_eq!(config.backend.timeout_secs, 15);
        assert_eq!(config.tax_rate_bps, 1100);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ConsoleConfig::default();
        config.apply_overrides(env(&[
            ("KASIR_API_URL", "https://pos.example.id"),
            ("KASIR_API_TOKEN", "secret"),
            ("KASIR_TAX_RATE", "12"),
            ("KASIR_TIMEOUT_SECS", "30"),
            ("KASIR_CURRENCY_SYMBOL", "IDR"),
        ]));

        assert_eq!(config.backend.url, "https://pos.example.id");
        assert_eq!(config.backend.token.as_deref(), Some("secret"));
        assert_eq!(config.tax_rate_bps, 1200);
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.currency.symbol, "IDR");
    }

    #[test]
    fn test_invalid_env_values_ignored() {
        let mut config = ConsoleConfig::default();
        config.apply_overrides(env(&[
            ("KASIR_TAX_RATE", "eleven"),
            ("KASIR_TIMEOUT_SECS", "-1"),
        ]));
        assert_eq!(config.tax_rate_bps, 1100);
        assert_eq!(config.backend.timeout_secs, 15);
    }

    #[test]
    fn test_validation() {
        let mut config = ConsoleConfig::default();
        config.backend.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ConsoleConfig::default();
        config.backend.url = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("kasir-console-does-not-exist.toml");
        assert!(ConsoleConfig::load(Some(path)).is_ok());
    }
}
