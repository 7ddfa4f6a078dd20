//! Synthetic usage generation
//!
//! Produces a deterministic per-hour usage trace for an app profile. A
//! half-period sine "burst" signal models diurnal intensity, and each
//! dimension gets multiplicative Gaussian noise from a locally owned,
//! seeded generator.

use crate::error::{GuardianError, Result};
use crate::models::{AppProfile, UsageSample, UsageTrace};
use crate::observability::StructuredLogger;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Default relative noise applied to every usage dimension
pub const DEFAULT_NOISE: f64 = 0.1;

/// Default number of simulated hours
pub const DEFAULT_HOURS: usize = 12;

/// Default random seed
pub const DEFAULT_SEED: u64 = 42;

/// Upper bound on screen-on minutes per hour
pub const MAX_SCREEN_MIN: f64 = 60.0;

/// Generator configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageConfig {
    /// Number of hourly samples to generate
    pub hours: usize,
    /// Relative noise level (standard deviation of the multiplier)
    pub noise: f64,
    /// Random seed for reproducibility
    pub seed: u64,
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            hours: DEFAULT_HOURS,
            noise: DEFAULT_NOISE,
            seed: DEFAULT_SEED,
        }
    }
}

impl UsageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hours(mut self, hours: usize) -> Self {
        self.hours = hours;
        self
    }

    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.hours < 1 {
            return Err(GuardianError::InvalidArgument(
                "hours must be at least 1".to_string(),
            ));
        }
        if !self.noise.is_finite() || self.noise < 0.0 {
            return Err(GuardianError::InvalidArgument(format!(
                "noise must be a non-negative number, got {}",
                self.noise
            )));
        }
        Ok(())
    }
}

/// Generate a trace with the default noise level
pub fn generate_usage(profile: &AppProfile, hours: usize, seed: u64) -> Result<UsageTrace> {
    generate(
        profile,
        &UsageConfig::default().with_hours(hours).with_seed(seed),
    )
}

/// Generate a trace of `config.hours` samples for `profile`
pub fn generate(profile: &AppProfile, config: &UsageConfig) -> Result<UsageTrace> {
    config.validate()?;

    let hours = config.hours;
    let mut rng = StdRng::seed_from_u64(config.seed);

    // One noise vector per dimension, drawn in dimension order
    let cpu_noise = normal_draws(&mut rng, hours);
    let net_noise = normal_draws(&mut rng, hours);
    let screen_noise = normal_draws(&mut rng, hours);
    let sensor_noise = normal_draws(&mut rng, hours);

    let trace = (0..hours)
        .map(|t| {
            let b = burst(t, hours);
            let jitter = |z: f64| 1.0 + config.noise * z;

            let cpu = profile.base_cpu * (0.8 + 0.4 * b) * jitter(cpu_noise[t]);
            let net = profile.base_net * (0.6 + 0.8 * b) * jitter(net_noise[t]);
            let screen = profile.base_screen * (0.7 + 0.6 * b) * jitter(screen_noise[t]);
            let sensors = profile.base_sensors * (0.7 + 0.6 * b) * jitter(sensor_noise[t]);

            UsageSample {
                hour: t,
                cpu_pct: cpu.clamp(0.0, 100.0),
                net_mb: net.max(0.0),
                screen_min: screen.clamp(0.0, MAX_SCREEN_MIN),
                sensors_util: sensors.clamp(0.0, 1.0),
                intent: profile.intent,
                measured_drain_pct_per_h: None,
            }
        })
        .collect();

    StructuredLogger::new("generator").log_usage_generated(
        &profile.name,
        hours,
        config.seed,
        config.noise,
    );
    Ok(trace)
}

/// Cyclical intensity in [0, 1] over one period of `hours`
pub fn burst(hour: usize, hours: usize) -> f64 {
    let phase = hour as f64 / hours.max(1) as f64;
    ((phase * 2.0 * PI).sin() + 1.0) / 2.0
}

fn normal_draws(rng: &mut StdRng, n: usize) -> Vec<f64> {
    (0..n).map(|_| rng.sample::<f64, _>(StandardNormal)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{find_profile, sample_catalog};

    #[test]
    fn test_generation_is_deterministic() {
        let profile = find_profile("YouTube").unwrap();
        let a = generate_usage(&profile, 24, 7).unwrap();
        let b = generate_usage(&profile, 24, 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let profile = find_profile("Instagram").unwrap();
        let a = generate_usage(&profile, 12, 1).unwrap();
        let b = generate_usage(&profile, 12, 2).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_trace_length_and_hour_index() {
        let profile = find_profile("Chrome / Reading").unwrap();
        let trace = generate_usage(&profile, 9, 42).unwrap();
        assert_eq!(trace.len(), 9);
        for (i, s) in trace.iter().enumerate() {
            assert_eq!(s.hour, i);
            assert_eq!(s.intent, profile.intent);
            assert!(s.measured_drain_pct_per_h.is_none());
        }
    }

    #[test]
    fn test_range_invariants_under_heavy_noise() {
        for profile in sample_catalog() {
            let config = UsageConfig::new().with_hours(24).with_noise(2.5).with_seed(3);
            for s in generate(&profile, &config).unwrap() {
                assert!((0.0..=100.0).contains(&s.cpu_pct), "cpu {}", s.cpu_pct);
                assert!(s.net_mb >= 0.0, "net {}", s.net_mb);
                assert!((0.0..=60.0).contains(&s.screen_min), "screen {}", s.screen_min);
                assert!((0.0..=1.0).contains(&s.sensors_util), "sensors {}", s.sensors_util);
            }
        }
    }

    #[test]
    fn test_zero_noise_follows_burst() {
        let profile = find_profile("YouTube").unwrap();
        let config = UsageConfig::new().with_hours(4).with_noise(0.0);
        let trace = generate(&profile, &config).unwrap();

        // t=0 -> burst 0.5, t=1 -> burst 1.0, t=3 -> burst 0.0
        assert!((trace[0].cpu_pct - 35.0).abs() < 1e-9);
        assert!((trace[1].cpu_pct - 35.0 * 1.2).abs() < 1e-9);
        assert!((trace[3].cpu_pct - 35.0 * 0.8).abs() < 1e-9);
        assert!((trace[1].net_mb - 400.0 * 1.4).abs() < 1e-9);
        // 55 * 1.3 exceeds the cap
        assert_eq!(trace[1].screen_min, 60.0);
    }

    #[test]
    fn test_whatsapp_single_hour() {
        let profile = find_profile("WhatsApp").unwrap();
        let trace = generate_usage(&profile, 1, 42).unwrap();
        assert_eq!(trace.len(), 1);
        let s = &trace[0];
        assert!(s.cpu_pct > 6.0 * 0.5 && s.cpu_pct < 6.0 * 1.5, "cpu {}", s.cpu_pct);
        assert_eq!(s.sensors_util, 0.0);
    }

    #[test]
    fn test_burst_bounds() {
        for h in 0..24 {
            let b = burst(h, 24);
            assert!((0.0..=1.0).contains(&b));
        }
        assert!((burst(0, 12) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let profile = find_profile("YouTube").unwrap();
        assert!(generate_usage(&profile, 0, 42).is_err());
        let bad_noise = UsageConfig::new().with_noise(-0.1);
        assert!(generate(&profile, &bad_noise).is_err());
        let nan_noise = UsageConfig::new().with_noise(f64::NAN);
        assert!(generate(&profile, &nan_noise).is_err());
    }
}
