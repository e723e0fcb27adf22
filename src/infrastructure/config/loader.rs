use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Drive base URL cannot be empty")]
    EmptyDriveBaseUrl,

    #[error("Oracle base URL cannot be empty")]
    EmptyOracleBaseUrl,

    #[error("Oracle model cannot be empty")]
    EmptyOracleModel,

    #[error("Invalid temperature: {0}. Must be between 0.0 and 1.0")]
    InvalidTemperature(f32),

    #[error("Invalid max_attempts: {0}. Must be at least 1")]
    InvalidMaxAttempts(u32),

    #[error("Invalid max_depth: {0}. Must be at least 1")]
    InvalidMaxDepth(u32),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must be less than max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .wayfinder/config.yaml (project config)
    /// 3. .wayfinder/local.yaml (local overrides, optional)
    /// 4. Environment variables (WAYFINDER_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".wayfinder/config.yaml"))
            .merge(Yaml::file(".wayfinder/local.yaml"))
            .merge(Env::prefixed("WAYFINDER_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.drive.base_url.is_empty() {
            return Err(ConfigError::EmptyDriveBaseUrl);
        }

        if config.oracle.base_url.is_empty() {
            return Err(ConfigError::EmptyOracleBaseUrl);
        }

        if config.oracle.model.is_empty() {
            return Err(ConfigError::EmptyOracleModel);
        }

        if !(0.0..=1.0).contains(&config.oracle.temperature) {
            return Err(ConfigError::InvalidTemperature(config.oracle.temperature));
        }

        if config.traversal.max_attempts == 0 {
            return Err(ConfigError::InvalidMaxAttempts(
                config.traversal.max_attempts,
            ));
        }

        if config.traversal.max_depth == 0 {
            return Err(ConfigError::InvalidMaxDepth(config.traversal.max_depth));
        }

        if config.retry.initial_backoff_ms >= config.retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.retry.initial_backoff_ms,
                config.retry.max_backoff_ms,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}
