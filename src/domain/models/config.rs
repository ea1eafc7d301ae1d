//! Configuration model for costforge.

use serde::{Deserialize, Serialize};

use super::convergence::ConvergenceSettings;

/// Main configuration structure for costforge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Path to the priced-line catalog YAML file.
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Convergence loop configuration.
    #[serde(default)]
    pub convergence: ConvergenceConfig,

    /// Simulated estimate service configuration.
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_catalog_path() -> String {
    "assets/catalog-sample.yaml".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            convergence: ConvergenceConfig::default(),
            simulation: SimulationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Convergence loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ConvergenceConfig {
    /// Absolute tolerance on `|target - achieved|`.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Maximum submit/measure attempts per run.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_tolerance() -> f64 {
    0.01
}

const fn default_max_attempts() -> u32 {
    8
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl ConvergenceConfig {
    /// Convert into runtime [`ConvergenceSettings`].
    pub fn to_settings(&self) -> ConvergenceSettings {
        ConvergenceSettings {
            tolerance: self.tolerance,
            max_attempts: self.max_attempts,
        }
    }
}

/// Cost rules for the simulated estimate service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SimulationConfig {
    /// Minimum amount billed per service group that has any usage.
    #[serde(default = "default_minimum_service_fee")]
    pub minimum_service_fee: f64,

    /// Total above which the tier discount applies.
    #[serde(default = "default_tier_threshold")]
    pub tier_threshold: f64,

    /// Fractional discount applied above the tier threshold.
    #[serde(default = "default_tier_discount_pct")]
    pub tier_discount_pct: f64,

    /// Service groups the simulated backend refuses to price.
    #[serde(default)]
    pub rejected_services: Vec<String>,
}

fn default_minimum_service_fee() -> f64 {
    1.0
}

fn default_tier_threshold() -> f64 {
    10_000.0
}

fn default_tier_discount_pct() -> f64 {
    0.05
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            minimum_service_fee: default_minimum_service_fee(),
            tier_threshold: default_tier_threshold(),
            tier_discount_pct: default_tier_discount_pct(),
            rejected_services: vec![],
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty.
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.convergence.max_attempts, 8);
        assert!(config.convergence.tolerance > 0.0);
        assert!(config.simulation.tier_discount_pct < 1.0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn convergence_config_converts_to_settings() {
        let config = ConvergenceConfig {
            tolerance: 0.5,
            max_attempts: 3,
        };
        let settings = config.to_settings();
        assert_eq!(settings.tolerance, 0.5);
        assert_eq!(settings.max_attempts, 3);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config: Config = serde_yaml::from_str("convergence:\n  max_attempts: 2\n").unwrap();
        assert_eq!(config.convergence.max_attempts, 2);
        assert_eq!(config.convergence.tolerance, default_tolerance());
        assert_eq!(config.catalog_path, default_catalog_path());
    }
}
