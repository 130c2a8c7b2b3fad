//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::scalar::{format_broken, format_compact, ScalarInterval};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// How scalar intervals are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScalarStyle {
    /// Seconds only, e.g. `PT3723.5S`
    Compact,
    /// Hours, minutes and seconds, e.g. `PT1H2M3.5S`
    #[default]
    Broken,
}

impl ScalarStyle {
    pub fn render(&self, value: ScalarInterval) -> String {
        match self {
            ScalarStyle::Compact => format_compact(value),
            ScalarStyle::Broken => format_broken(value),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub scalar_style: ScalarStyle,

    /// Refuse negative durations on input
    #[serde(default)]
    pub reject_negative: bool,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            scalar_style: ScalarStyle::default(),
            reject_negative: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the log level (e.g. from the command line) and re-validate.
    pub fn with_log_level(mut self, log_level: &str) -> Result<Self, ConfigError> {
        self.log_level = log_level.to_string();
        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // same directive syntax as RUST_LOG, e.g. "warn,iso_duration=debug"
        EnvFilter::try_new(&self.log_level).map_err(|e| {
            ConfigError::ValidationError(format!("Invalid log level '{}': {}", self.log_level, e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, "warn");
        assert_eq!(config.scalar_style, ScalarStyle::Broken);
        assert!(!config.reject_negative);
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_log_level() {
        let mut config = AppConfig::default();
        config.log_level = "iso_duration=loud".to_string();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_config_validation_accepts_filter_directives() {
        let mut config = AppConfig::default();
        config.log_level = "warn,iso_duration=debug".to_string();
        assert!(config.validate().is_ok());

        config.log_level = "trace".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_log_level_validates_override() {
        let config = AppConfig::default()
            .with_log_level("info,iso_duration::calendar=trace")
            .unwrap();
        assert_eq!(config.log_level, "info,iso_duration::calendar=trace");

        assert!(AppConfig::default().with_log_level("iso_duration=verbose").is_err());
    }

    #[test]
    fn test_config_from_file_with_directive() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"warn,iso_duration=debug\"").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.log_level, "warn,iso_duration=debug");
    }

    #[test]
    fn test_scalar_style_render() {
        let value = ScalarInterval::from_nanos(3_723_500_000_000);
        assert_eq!(ScalarStyle::Compact.render(value), "PT3723.5S");
        assert_eq!(ScalarStyle::Broken.render(value), "PT1H2M3.5S");
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig {
            scalar_style: ScalarStyle::Compact,
            ..AppConfig::default()
        };
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("scalar_style = \"compact\""));

        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.scalar_style, ScalarStyle::Compact);
    }

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"debug\"").unwrap();
        writeln!(file, "reject_negative = true").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.log_level, "debug");
        assert!(config.reject_negative);
        assert_eq!(config.scalar_style, ScalarStyle::Broken);
    }

    #[test]
    fn test_config_from_file_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "scalar_style = \"sideways\"").unwrap();

        assert!(matches!(
            AppConfig::from_file(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_config_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::from_file(&dir.path().join("missing.toml"));

        assert!(matches!(result, Err(ConfigError::ReadError(_))));
    }
}
