//! Configuration loading utilities

use crate::schema::{CatalogFormat, Config};
use polingo_common::{Locale, LocaleTagError};
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_VAR: &str = "POLINGO_CONFIG_PATH";

/// Files probed in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["polingo.yaml", "polingo.yml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        /// Variable name.
        var: String,
        /// Underlying parse failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        debug!("Loading configuration from {}", path.as_ref().display());
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        Self::apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from `POLINGO_CONFIG_PATH`, then `polingo.yaml` /
    /// `polingo.yml`, falling back to defaults. Environment overrides apply
    /// in every case.
    pub fn load() -> Result<Config, ConfigError> {
        if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            return Self::load_config(config_path);
        }

        for candidate in DEFAULT_CONFIG_FILES {
            if Path::new(candidate).exists() {
                return Self::load_config(candidate);
            }
        }

        info!("No configuration file found, using defaults");
        let mut config = Config::default();
        Self::apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string, without env overrides.
    pub fn from_yaml_str(content: &str) -> Result<Config, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_overrides(config, |var| env::var(var).ok())
    }

    /// Apply overrides read through `lookup`, which maps a variable name to its value.
    pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(locale) = lookup("POLINGO_LOCALE") {
            config.locale = parse_locale("POLINGO_LOCALE", &locale)?;
        }

        if let Some(locales) = lookup("POLINGO_LOCALES") {
            config.locales = locales
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|tag| parse_locale("POLINGO_LOCALES", tag))
                .collect::<Result<_, _>>()?;
        }

        if let Some(fallback) = lookup("POLINGO_FALLBACK") {
            config.fallback = if fallback.trim().is_empty() {
                None
            } else {
                Some(parse_locale("POLINGO_FALLBACK", &fallback)?)
            };
        }

        if let Some(base_url) = lookup("POLINGO_BASE_URL") {
            config.loader.base_url = base_url;
        }

        if let Some(format) = lookup("POLINGO_FORMAT") {
            config.loader.format = format.parse::<CatalogFormat>().map_err(|e| {
                ConfigError::EnvParseError {
                    var: "POLINGO_FORMAT".to_string(),
                    source: e.into(),
                }
            })?;
        }

        if let Some(cache) = lookup("POLINGO_CACHE") {
            config.cache.enabled = cache.trim().parse().map_err(|e| ConfigError::EnvParseError {
                var: "POLINGO_CACHE".to_string(),
                source: Box::new(e),
            })?;
        }

        if let Some(level) = lookup("POLINGO_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}

fn parse_locale(var: &str, tag: &str) -> Result<Locale, ConfigError> {
    Locale::parse(tag).map_err(|e: LocaleTagError| ConfigError::EnvParseError {
        var: var.to_string(),
        source: Box::new(e),
    })
}
