//! Hierarchical configuration loader.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid tolerance: {0}. Must be positive")]
    InvalidTolerance(f64),

    #[error("Invalid max_attempts: {0}. Must be at least 1")]
    InvalidMaxAttempts(u32),

    #[error("Invalid minimum_service_fee: {0}. Must not be negative")]
    InvalidMinimumFee(f64),

    #[error("Invalid tier_discount_pct: {0}. Must be in [0, 1)")]
    InvalidTierDiscount(f64),

    #[error("Catalog path cannot be empty")]
    EmptyCatalogPath,

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
    /// 2. costforge.yaml (project config)
    /// 3. Environment variables (COSTFORGE_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            // 1. Start with programmatic defaults
            .merge(Serialized::defaults(Config::default()))
            // 2. Merge project config
            .merge(Yaml::file("costforge.yaml"))
            // 3. Merge environment variables (highest priority)
            .merge(Env::prefixed("COSTFORGE_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// `COSTFORGE_*` environment variables still take precedence over the
    /// file, matching [`ConfigLoader::load`].
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("COSTFORGE_").split("__"))
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
        if config.catalog_path.is_empty() {
            return Err(ConfigError::EmptyCatalogPath);
        }

        // Validate convergence config
        if config.convergence.tolerance <= 0.0 {
            return Err(ConfigError::InvalidTolerance(config.convergence.tolerance));
        }
        if config.convergence.max_attempts == 0 {
            return Err(ConfigError::InvalidMaxAttempts(
                config.convergence.max_attempts,
            ));
        }

        // Validate simulation config
        if config.simulation.minimum_service_fee < 0.0 {
            return Err(ConfigError::InvalidMinimumFee(
                config.simulation.minimum_service_fee,
            ));
        }
        if !(0.0..1.0).contains(&config.simulation.tier_discount_pct) {
            return Err(ConfigError::InvalidTierDiscount(
                config.simulation.tier_discount_pct,
            ));
        }

        // Validate logging config
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
