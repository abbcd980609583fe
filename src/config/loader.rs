//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{EngineConfig, InvoicingConfig, OvertimePolicy, TimeEntryRules};

/// Loads and provides access to the engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/fr_default/
/// ├── overtime.yaml      # Weekly overtime thresholds and multipliers
/// ├── invoicing.yaml     # Currency, VAT, payment terms, placeholders
/// └── time_entries.yaml  # Time entry validation rules
/// ```
///
/// # Example
///
/// ```no_run
/// use invoice_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/fr_default")?;
/// println!("Normal weekly hours: {}", loader.config().overtime().normal_weekly_hours);
/// # Ok::<(), invoice_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if any of the three files is missing or malformed.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let overtime = Self::load_yaml::<OvertimePolicy>(&path.join("overtime.yaml"))?;
        let invoicing = Self::load_yaml::<InvoicingConfig>(&path.join("invoicing.yaml"))?;
        let time_entries = Self::load_yaml::<TimeEntryRules>(&path.join("time_entries.yaml"))?;

        if overtime.tier_125_ceiling_hours < overtime.normal_weekly_hours {
            return Err(EngineError::ConfigParseError {
                path: path.join("overtime.yaml").display().to_string(),
                message: "tier_125_ceiling_hours must not be below normal_weekly_hours"
                    .to_string(),
            });
        }

        debug!(path = %path.display(), "Loaded engine configuration");

        Ok(Self {
            config: EngineConfig::new(overtime, invoicing, time_entries),
        })
    }

    /// Wraps an already built configuration.
    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> EngineConfig {
        self.config
    }
}
