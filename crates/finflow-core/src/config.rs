//! Configuration loading
//!
//! Loads settings from TOML. Lookup order:
//! 1. An explicit path (`--config`)
//! 2. `<config_dir>/finflow/config.toml` if it exists
//! 3. The embedded defaults in `config/finflow.toml`

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::anomaly::{AnomalyConfig, AnomalyDetector};
use crate::categorize::{Categorizer, RuleConfig};
use crate::error::{Error, Result};
use crate::forecast::{Forecaster, DEFAULT_HORIZON_MONTHS};
use crate::models::{normalize_currency, DEFAULT_CURRENCY};

/// Default configuration (embedded at compile time)
const DEFAULT_CONFIG: &str = include_str!("../../../config/finflow.toml");

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    pub default_currency: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            default_currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastConfig {
    pub horizon_months: u32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_months: DEFAULT_HORIZON_MONTHS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CategoriesConfig {
    /// Ordered; empty means the built-in table
    pub rules: Vec<RuleConfig>,
}

/// Top-level settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub ingest: IngestConfig,
    pub forecast: ForecastConfig,
    pub anomaly: AnomalyConfig,
    pub categories: CategoriesConfig,
}

impl Config {
    /// Load from `path`, the user config file, or the embedded defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let content = match path {
            Some(path) => fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read {}: {}", path.display(), e))
            })?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(default_path) => {
                    debug!(path = %default_path.display(), "Using user config");
                    fs::read_to_string(&default_path)?
                }
                None => DEFAULT_CONFIG.to_string(),
            },
        };

        Self::parse(&content)
    }

    /// Parse and validate TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        config.validate()?;
        config.ingest.default_currency = normalize_currency(&config.ingest.default_currency)
            .map_err(|e| Error::Config(e.to_string()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        normalize_currency(&self.ingest.default_currency)
            .map_err(|e| Error::Config(format!("ingest.default_currency: {}", e)))?;

        if self.forecast.horizon_months == 0 {
            return Err(Error::Config(
                "forecast.horizon_months must be at least 1".to_string(),
            ));
        }

        let contamination = self.anomaly.contamination;
        if !(contamination > 0.0 && contamination <= 0.5) {
            return Err(Error::Config(format!(
                "anomaly.contamination must be in (0, 0.5] (got {})",
                contamination
            )));
        }
        if self.anomaly.trees == 0 {
            return Err(Error::Config("anomaly.trees must be at least 1".to_string()));
        }
        if self.anomaly.max_samples < 2 {
            return Err(Error::Config(
                "anomaly.max_samples must be at least 2".to_string(),
            ));
        }

        Ok(())
    }

    /// Compile the configured category rules
    pub fn categorizer(&self) -> Result<Categorizer> {
        Categorizer::from_rules(&self.categories.rules)
    }

    pub fn forecaster(&self) -> Forecaster {
        Forecaster::with_horizon(self.forecast.horizon_months)
    }

    pub fn detector(&self) -> AnomalyDetector {
        AnomalyDetector::with_config(self.anomaly)
    }
}

/// User config location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("finflow").join("config.toml"))
}
