//! Feature construction for drain-rate regression
//!
//! Both fitting and prediction go through [`DrainFeatures::from_sample`], so
//! the two paths always share one schema: the four raw usage dimensions,
//! two screen interaction terms and a performance-intent flag.

use crate::models::UsageSample;
use serde::{Deserialize, Serialize};

/// Number of regression features per row
pub const NUM_FEATURES: usize = 7;

/// Additive constant of the heuristic drain target
pub const HEURISTIC_INTERCEPT: f64 = 1.0;

/// Heuristic weights, in `DrainFeatures::to_array` order
pub const HEURISTIC_WEIGHTS: [f64; NUM_FEATURES] = [
    0.03,    // cpu_pct
    0.01,    // net_mb
    0.05,    // screen_min
    7.5,     // sensors_util
    0.0002,  // cpu_screen
    0.00005, // net_screen
    2.0,     // intent_perf
];

/// Regression inputs for a single hour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrainFeatures {
    pub cpu_pct: f64,
    pub net_mb: f64,
    pub screen_min: f64,
    pub sensors_util: f64,
    pub cpu_screen: f64,
    pub net_screen: f64,
    /// 1.0 for performance intent, 0.0 otherwise
    pub intent_perf: f64,
}

impl DrainFeatures {
    pub fn from_sample(sample: &UsageSample) -> Self {
        Self {
            cpu_pct: sample.cpu_pct,
            net_mb: sample.net_mb,
            screen_min: sample.screen_min,
            sensors_util: sample.sensors_util,
            cpu_screen: sample.cpu_pct * sample.screen_min,
            net_screen: sample.net_mb * sample.screen_min,
            intent_perf: if sample.intent.is_performance() { 1.0 } else { 0.0 },
        }
    }

    pub fn to_array(&self) -> [f64; NUM_FEATURES] {
        [
            self.cpu_pct,
            self.net_mb,
            self.screen_min,
            self.sensors_util,
            self.cpu_screen,
            self.net_screen,
            self.intent_perf,
        ]
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

/// Synthetic drain target (%/h) used when no measured drain is available
pub fn heuristic_target(features: &DrainFeatures) -> f64 {
    features
        .to_array()
        .iter()
        .zip(HEURISTIC_WEIGHTS.iter())
        .map(|(x, w)| x * w)
        .sum::<f64>()
        + HEURISTIC_INTERCEPT
}

/// Feature matrix and target vector for a trace
///
/// Rows with a measured drain use it as the target; all others fall back to
/// [`heuristic_target`].
pub fn build_training_set(trace: &[UsageSample]) -> (Vec<[f64; NUM_FEATURES]>, Vec<f64>) {
    trace
        .iter()
        .map(|sample| {
            let features = DrainFeatures::from_sample(sample);
            let target = sample
                .measured_drain_pct_per_h
                .unwrap_or_else(|| heuristic_target(&features));
            (features.to_array(), target)
        })
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Intent;

    fn sample(cpu: f64, net: f64, screen: f64, sensors: f64, intent: Intent) -> UsageSample {
        UsageSample {
            hour: 0,
            cpu_pct: cpu,
            net_mb: net,
            screen_min: screen,
            sensors_util: sensors,
            intent,
            measured_drain_pct_per_h: None,
        }
    }

    #[test]
    fn test_idle_eco_row_targets_intercept() {
        let f = DrainFeatures::from_sample(&sample(0.0, 0.0, 0.0, 0.0, Intent::Eco));
        assert_eq!(heuristic_target(&f), 1.0);
    }

    #[test]
    fn test_heuristic_weights() {
        let f = DrainFeatures::from_sample(&sample(10.0, 100.0, 20.0, 0.5, Intent::Performance));
        let expected = 0.03 * 10.0
            + 0.01 * 100.0
            + 0.05 * 20.0
            + 7.5 * 0.5
            + 0.0002 * 200.0
            + 0.00005 * 2000.0
            + 2.0
            + 1.0;
        assert!((heuristic_target(&f) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_interaction_terms_and_flag() {
        let f = DrainFeatures::from_sample(&sample(40.0, 150.0, 30.0, 0.2, Intent::Performance));
        assert_eq!(f.cpu_screen, 1200.0);
        assert_eq!(f.net_screen, 4500.0);
        assert_eq!(f.intent_perf, 1.0);

        let eco = DrainFeatures::from_sample(&sample(40.0, 150.0, 30.0, 0.2, Intent::Eco));
        assert_eq!(eco.intent_perf, 0.0);
    }

    #[test]
    fn test_measured_drain_overrides_heuristic() {
        let mut measured = sample(50.0, 50.0, 50.0, 0.5, Intent::Eco);
        measured.measured_drain_pct_per_h = Some(9.25);
        let plain = sample(0.0, 0.0, 0.0, 0.0, Intent::Eco);

        let (x, y) = build_training_set(&[measured, plain]);
        assert_eq!(x.len(), 2);
        assert_eq!(y, vec![9.25, 1.0]);
    }

    #[test]
    fn test_non_finite_detection() {
        let f = DrainFeatures::from_sample(&sample(f64::NAN, 0.0, 0.0, 0.0, Intent::Eco));
        assert!(!f.is_finite());
    }
}
