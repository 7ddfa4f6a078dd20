//! Savings metrics derived from simulated curves

use crate::models::{SavingsMetrics, SimulationResult};
use crate::observability::StructuredLogger;
use crate::optimizer::round2;

/// Battery level the "extra hours" metric counts against
pub const LOW_BATTERY_THRESHOLD_PCT: f64 = 20.0;

/// Summarise how far the optimized curve improves on baseline
///
/// `extra_hours_above_20pct` counts rows above the threshold on each curve
/// and takes the difference; rows need not be contiguous.
pub fn analyze_savings(results: &[SimulationResult]) -> SavingsMetrics {
    let Some(last) = results.last() else {
        return SavingsMetrics::default();
    };

    let saved = (last.optimized_battery_pct - last.baseline_battery_pct).max(0.0);

    let extra = rows_above_threshold(results, |r| r.optimized_battery_pct)
        - rows_above_threshold(results, |r| r.baseline_battery_pct);

    let metrics = SavingsMetrics {
        battery_saved_pct: round2(saved),
        extra_hours_above_20pct: extra.max(0) as u32,
    };
    StructuredLogger::new("savings")
        .log_savings(metrics.battery_saved_pct, metrics.extra_hours_above_20pct);
    metrics
}

fn rows_above_threshold(
    results: &[SimulationResult],
    level: impl Fn(&SimulationResult) -> f64,
) -> i64 {
    results
        .iter()
        .filter(|r| level(r) > LOW_BATTERY_THRESHOLD_PCT)
        .count() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(baseline: &[f64], optimized: &[f64]) -> Vec<SimulationResult> {
        baseline
            .iter()
            .zip(optimized.iter())
            .enumerate()
            .map(|(hour, (&b, &o))| SimulationResult {
                hour,
                baseline_drain_pct_per_h: 1.0,
                optimized_drain_pct_per_h: 1.0,
                baseline_battery_pct: b,
                optimized_battery_pct: o,
                actions: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn test_all_rows_cross_threshold() {
        let results = curve(&[19.0, 18.0, 17.0, 16.0, 15.0], &[30.0, 28.0, 26.0, 24.0, 22.0]);
        let m = analyze_savings(&results);
        assert_eq!(m.extra_hours_above_20pct, 5);
        assert_eq!(m.battery_saved_pct, 7.0);
    }

    #[test]
    fn test_saved_pct_rounded() {
        let results = curve(&[80.0, 60.123], &[85.0, 63.4567]);
        assert_eq!(analyze_savings(&results).battery_saved_pct, 3.33);
    }

    #[test]
    fn test_negative_difference_clamped() {
        let results = curve(&[90.0, 25.0, 10.0], &[90.0, 15.0, 5.0]);
        let m = analyze_savings(&results);
        assert_eq!(m.battery_saved_pct, 0.0);
        assert_eq!(m.extra_hours_above_20pct, 0);
    }

    #[test]
    fn test_rows_counted_not_contiguous_duration() {
        // Exactly 20 is not "above"
        let results = curve(&[50.0, 20.0, 10.0, 5.0], &[50.0, 21.0, 20.0, 19.0]);
        assert_eq!(analyze_savings(&results).extra_hours_above_20pct, 1);
    }

    #[test]
    fn test_empty_results() {
        assert_eq!(analyze_savings(&[]), SavingsMetrics::default());
    }
}
