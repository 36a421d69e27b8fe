use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};
use thiserror::Error;

use crate::pagination::{ListOptions, DEFAULT_PAGE_SIZE};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Client-wide defaults applied when a call does not pass its own options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "ClientConfig::default_page_size_value")]
    pub default_page_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_limit: Option<usize>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            default_page_size: Self::default_page_size_value(),
            default_limit: None,
        }
    }
}

impl ClientConfig {
    pub fn default_page_size_value() -> u32 {
        DEFAULT_PAGE_SIZE
    }

    /// Loads a JSON config file, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn from_json_str(data: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig =
            serde_json::from_str(data).map_err(|err| ConfigError::Serde(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ListOptions::from_config(self)
            .validate()
            .map_err(|err| ConfigError::Invalid(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = ClientConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.default_page_size, 100);
        assert_eq!(config.default_limit, None);
    }

    #[test]
    fn oversized_page_size_is_rejected() {
        let err = ClientConfig::from_json_str(r#"{"default_page_size": 250}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn garbage_is_a_serde_error() {
        let err = ClientConfig::from_json_str("page_size = 20").unwrap_err();
        assert!(matches!(err, ConfigError::Serde(_)));
    }
}
