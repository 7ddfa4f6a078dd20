//! Configuration management for the CLI

use anyhow::Result;
use guardian_lib::generator::{DEFAULT_HOURS, DEFAULT_NOISE, DEFAULT_SEED};
use guardian_lib::optimizer::DEFAULT_AGGRESSIVENESS;
use guardian_lib::simulator::FULL_BATTERY_PCT;
use serde::Deserialize;

/// Simulation defaults, overridable through `BGUARD_*` environment variables
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GuardianConfig {
    /// Default app profile name
    #[serde(default = "default_app")]
    pub app: String,

    /// Total simulated hours
    #[serde(default = "default_hours")]
    pub hours: usize,

    /// Optimization aggressiveness in (0, 1]
    #[serde(default = "default_aggressiveness")]
    pub aggressiveness: f64,

    /// Random seed for usage generation
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Relative usage noise
    #[serde(default = "default_noise")]
    pub noise: f64,

    /// Battery level at hour 0
    #[serde(default = "default_start_battery")]
    pub start_battery: f64,
}

fn default_app() -> String {
    "YouTube".to_string()
}

fn default_hours() -> usize {
    DEFAULT_HOURS
}

fn default_aggressiveness() -> f64 {
    DEFAULT_AGGRESSIVENESS
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_noise() -> f64 {
    DEFAULT_NOISE
}

fn default_start_battery() -> f64 {
    FULL_BATTERY_PCT
}

impl Default for GuardianConfig {
    fn default() -> Self {
        Self {
            app: default_app(),
            hours: default_hours(),
            aggressiveness: default_aggressiveness(),
            seed: default_seed(),
            noise: default_noise(),
            start_battery: default_start_battery(),
        }
    }
}

impl GuardianConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("BGUARD").try_parsing(true))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Invalid BGUARD_* configuration, using defaults");
            GuardianConfig::default()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_dashboard() {
        let config = GuardianConfig::default();
        assert_eq!(config.app, "YouTube");
        assert_eq!(config.hours, 12);
        assert_eq!(config.aggressiveness, 0.6);
        assert_eq!(config.seed, 42);
        assert_eq!(config.noise, 0.1);
        assert_eq!(config.start_battery, 100.0);
    }

    #[test]
    fn test_partial_source_fills_defaults() {
        let config: GuardianConfig = config::Config::builder()
            .set_override("hours", 6i64)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.hours, 6);
        assert_eq!(config.seed, 42);
    }
}
