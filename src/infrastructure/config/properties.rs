//! Flat string-keyed property set.
//!
//! Nested TOML tables are flattened into dotted keys, so
//!
//! ```toml
//! [adapter.websubhub]
//! enabled = true
//! ```
//!
//! yields `adapter.websubhub.enabled = "true"`. Blank values read as absent.

use std::collections::BTreeMap;

use crate::error::ConfigError;

/// Environment variables that override file properties.
const ENV_OVERRIDES: [(&str, &str); 2] = [
    ("WEBSUBHUB_ENABLED", "adapter.websubhub.enabled"),
    ("WEBSUBHUB_BASE_URL", "adapter.websubhub.baseUrl"),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    values: BTreeMap<String, String>,
}

impl Properties {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = toml::from_str(content).map_err(ConfigError::Parse)?;
        Ok(Self::from_table(&table))
    }

    #[must_use]
    pub fn from_table(table: &toml::Table) -> Self {
        let mut properties = Self::new();
        flatten_into(&mut properties.values, None, table);
        properties
    }

    /// Builder-style insert, handy for programmatic configuration.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Value for `key`, or `None` when missing or blank.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// Apply `WEBSUBHUB_*` environment overrides.
    pub fn apply_env_overrides(&mut self) {
        for (var, key) in ENV_OVERRIDES {
            if let Ok(value) = std::env::var(var) {
                self.insert(key, value);
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn flatten_into(out: &mut BTreeMap<String, String>, prefix: Option<&str>, table: &toml::Table) {
    for (key, value) in table {
        let full_key = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };
        match value {
            toml::Value::Table(nested) => flatten_into(out, Some(&full_key), nested),
            toml::Value::String(s) => {
                out.insert(full_key, s.clone());
            }
            other => {
                out.insert(full_key, other.to_string());
            }
        }
    }
}
