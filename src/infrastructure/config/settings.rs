//! Settings file loading.
//!
//! One TOML file carries both the `[logging]` table and the adapter
//! properties. Everything outside `[logging]` is flattened into the
//! [`Properties`] set the adapter configuration is derived from.
//!
//! # Example
//!
//! ```no_run
//! use websubhub_publisher::infrastructure::config::settings::Settings;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::load("websubhub.toml")?;
//!     settings.init_logging();
//!     let adapter = settings.adapter()?;
//!     println!("enabled: {}", adapter.is_enabled());
//!     Ok(())
//! }
//! ```

use std::fs;
use std::path::Path;

use super::adapter::AdapterConfiguration;
use super::logging::LoggingConfig;
use super::properties::Properties;
use crate::error::{ConfigError, Result};

const LOGGING_TABLE: &str = "logging";

/// Parsed settings file.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub properties: Properties,
}

impl Settings {
    /// Read and parse a settings file, then apply environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut settings = Self::parse(&content)?;
        settings.properties.apply_env_overrides();
        Ok(settings)
    }

    /// Parse settings from TOML text without touching the environment.
    pub fn parse(content: &str) -> Result<Self> {
        let mut table: toml::Table = toml::from_str(content).map_err(ConfigError::Parse)?;

        let logging = match table.remove(LOGGING_TABLE) {
            Some(value) => value.try_into().map_err(|e: toml::de::Error| {
                ConfigError::InvalidValue {
                    field: LOGGING_TABLE,
                    reason: e.to_string(),
                }
            })?,
            None => LoggingConfig::default(),
        };

        Ok(Self {
            logging,
            properties: Properties::from_table(&table),
        })
    }

    /// Derive the validated adapter configuration.
    pub fn adapter(&self) -> Result<AdapterConfiguration> {
        Ok(AdapterConfiguration::from_properties(&self.properties)?)
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
