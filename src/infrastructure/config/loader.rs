//! Configuration loading with hierarchical merging.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Upstream base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("Invalid upstream timeout: {0}s. Must be at least 1")]
    InvalidUpstreamTimeout(u64),

    #[error("Cache url cannot be empty")]
    EmptyCacheUrl,

    #[error("Invalid cache TTL: {0}s. Must be at least 1")]
    InvalidTtl(u64),

    #[error("Invalid cache op timeout: {0}ms. Must be at least 1")]
    InvalidOpTimeout(u64),

    #[error("Cache key prefix cannot be empty or contain ':'")]
    InvalidKeyPrefix,

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must be less than max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    #[error("Invalid retry max_attempts: {0}. Must be at least 1 (the initial try)")]
    InvalidMaxAttempts(u32),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),
}

/// Configuration loader.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. `pokegate.yaml` in the working directory (optional)
    /// 3. Environment variables (`POKEGATE_*` prefix, `__` nesting)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file("pokegate.yaml"))
            .merge(Env::prefixed("POKEGATE_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file (env still wins).
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("POKEGATE_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.upstream.base_url.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if config.upstream.timeout_secs == 0 {
            return Err(ConfigError::InvalidUpstreamTimeout(
                config.upstream.timeout_secs,
            ));
        }
        if config.upstream.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidMaxAttempts(
                config.upstream.retry.max_attempts,
            ));
        }
        if config.upstream.retry.initial_backoff_ms >= config.upstream.retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.upstream.retry.initial_backoff_ms,
                config.upstream.retry.max_backoff_ms,
            ));
        }

        if config.cache.url.is_empty() {
            return Err(ConfigError::EmptyCacheUrl);
        }
        if config.cache.ttl_secs == 0 {
            return Err(ConfigError::InvalidTtl(config.cache.ttl_secs));
        }
        if config.cache.op_timeout_ms == 0 {
            return Err(ConfigError::InvalidOpTimeout(config.cache.op_timeout_ms));
        }
        if config.cache.key_prefix.is_empty() || config.cache.key_prefix.contains(':') {
            return Err(ConfigError::InvalidKeyPrefix);
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
