//! Battery curve simulation
//!
//! Predicts baseline drain for the whole trace in one batch, optimizes each
//! hour independently, then integrates both drain sequences into battery
//! curves from the same starting level.

use crate::models::{ActionExplanation, SimulationResult, UsageSample};
use crate::observability::{SimulationMetrics, StructuredLogger};
use crate::optimizer::{
    apply_to_drain, explain, optimize_row, DEFAULT_AGGRESSIVENESS, MIN_DRAIN_PCT_PER_H,
};
use crate::predictor::{predict_drain, DrainModel};
use serde::{Deserialize, Serialize};

/// Full battery level in percent
pub const FULL_BATTERY_PCT: f64 = 100.0;

/// Configuration for a simulation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Battery level at the start of hour 0
    pub start_battery: f64,
    /// Number of leading trace rows to simulate; the whole trace if `None`
    pub hours: Option<usize>,
    /// Optimization strength in (0, 1]
    pub aggressiveness: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_battery: FULL_BATTERY_PCT,
            hours: None,
            aggressiveness: DEFAULT_AGGRESSIVENESS,
        }
    }
}

impl SimulationConfig {
    pub fn with_start_battery(mut self, start_battery: f64) -> Self {
        self.start_battery = start_battery;
        self
    }

    pub fn with_hours(mut self, hours: usize) -> Self {
        self.hours = Some(hours);
        self
    }

    pub fn with_aggressiveness(mut self, aggressiveness: f64) -> Self {
        self.aggressiveness = aggressiveness;
        self
    }
}

impl SimulationResult {
    pub fn explain(&self) -> Vec<ActionExplanation> {
        explain(&self.actions)
    }
}

/// Simulate baseline and optimized battery curves over a trace
pub fn simulate(
    model: &DrainModel,
    trace: &[UsageSample],
    config: &SimulationConfig,
) -> Vec<SimulationResult> {
    let hours = config.hours.unwrap_or(trace.len()).min(trace.len());
    let rows = &trace[..hours];

    let baseline: Vec<f64> = predict_drain(model, rows)
        .into_iter()
        .map(floor_drain)
        .collect();

    let metrics = SimulationMetrics::new();
    let mut actions_per_row = Vec::with_capacity(rows.len());
    let mut optimized = Vec::with_capacity(rows.len());
    for (sample, &base) in rows.iter().zip(baseline.iter()) {
        let actions = optimize_row(sample, config.aggressiveness);
        for action in &actions {
            metrics.inc_action(&action.agent.to_string());
        }
        optimized.push(apply_to_drain(base, &actions));
        actions_per_row.push(actions);
    }

    let start = config.start_battery.clamp(0.0, FULL_BATTERY_PCT);
    let baseline_curve = integrate(start, &baseline);
    let optimized_curve = integrate(start, &optimized);

    let results: Vec<SimulationResult> = rows
        .iter()
        .zip(actions_per_row)
        .enumerate()
        .map(|(i, (sample, actions))| SimulationResult {
            hour: sample.hour,
            baseline_drain_pct_per_h: baseline[i],
            optimized_drain_pct_per_h: optimized[i],
            baseline_battery_pct: baseline_curve[i],
            optimized_battery_pct: optimized_curve[i],
            actions,
        })
        .collect();

    metrics.record_simulation(results.len());
    if let Some(last) = results.last() {
        StructuredLogger::new("simulator").log_simulation(
            results.len(),
            config.aggressiveness,
            last.baseline_battery_pct,
            last.optimized_battery_pct,
            results.iter().map(|r| r.actions.len()).sum(),
        );
    }

    results
}

/// Cumulative battery level after each hour, never below zero
pub fn integrate(start_battery: f64, drain_rates: &[f64]) -> Vec<f64> {
    drain_rates
        .iter()
        .scan(start_battery, |level, drain| {
            *level = (*level - drain).max(0.0);
            Some(*level)
        })
        .collect()
}

fn floor_drain(drain: f64) -> f64 {
    // NaN compares false and would stall the curve
    if drain.is_nan() {
        MIN_DRAIN_PCT_PER_H
    } else {
        drain.max(MIN_DRAIN_PCT_PER_H)
    }
}
