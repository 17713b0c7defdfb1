//! Configuration management for cashgrep
//!
//! This module handles loading and validation of cashgrep configuration
//! from YAML files. Every section is optional; a missing file yields the
//! defaults so the tool stays usable with nothing but `-f` on the command
//! line.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::ConfigError;

/// Ledger file configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DataConfig {
    /// Path to the GnuCash export to scan when -f is not given
    #[serde(default)]
    pub ledger_file: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Scan limits
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScanConfig {
    /// Soft cap on scanned elements; unset means unbounded
    #[serde(default)]
    pub max_elements: Option<u64>,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Ledger file settings
    #[serde(default)]
    pub data: DataConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Scan limits
    #[serde(default)]
    pub scan: ScanConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound {
                    path: path.to_string_lossy().to_string(),
                }
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::InvalidYaml {
                message: e.to_string(),
            })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.logging.level.as_str() {
            "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::InvalidValue {
                    field: "logging.level".to_string(),
                    reason: format!("unknown level '{}'", other),
                });
            }
        }

        if self.scan.max_elements == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "scan.max_elements".to_string(),
                reason: "must be greater than 0 (leave unset for unbounded)".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.data.ledger_file.is_none());
        assert!(config.scan.max_elements.is_none());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = "data:\n  ledger_file: /home/user/books.gnucash\nscan:\n  max_elements: 5000\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.data.ledger_file,
            Some(PathBuf::from("/home/user/books.gnucash"))
        );
        assert_eq!(config.scan.max_elements, Some(5000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_cap_rejected() {
        let yaml = "scan:\n  max_elements: 0\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_log_level_rejected() {
        let yaml = "logging:\n  level: loud\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_template_parses() {
        let config: Config = serde_yaml::from_str(Config::generate_default()).unwrap();
        assert!(config.validate().is_ok());
    }
}
