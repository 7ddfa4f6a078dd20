//! Observability infrastructure for the simulator
//!
//! Provides:
//! - Prometheus metrics (fit latency, forest and fallback fits, simulations, actions)
//! - Structured logging with tracing

use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Encoder, Histogram,
    IntCounter, IntCounterVec, TextEncoder,
};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Histogram buckets for model fitting latency (in seconds)
const FIT_LATENCY_BUCKETS: &[f64] = &[0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<SimulationMetricsInner> = OnceLock::new();

struct SimulationMetricsInner {
    fit_latency_seconds: Histogram,
    forest_fits: IntCounter,
    fallback_fits: IntCounter,
    simulations_run: IntCounter,
    hours_simulated: IntCounter,
    actions_applied: IntCounterVec,
}

impl SimulationMetricsInner {
    fn new() -> Self {
        Self {
            fit_latency_seconds: register_histogram!(
                "battery_guardian_fit_latency_seconds",
                "Time spent fitting the drain model",
                FIT_LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register fit_latency_seconds"),

            forest_fits: register_int_counter!(
                "battery_guardian_forest_fits_total",
                "Number of fits served by the tree ensemble"
            )
            .expect("Failed to register forest_fits"),

            fallback_fits: register_int_counter!(
                "battery_guardian_fallback_fits_total",
                "Number of fits that fell back to linear regression"
            )
            .expect("Failed to register fallback_fits"),

            simulations_run: register_int_counter!(
                "battery_guardian_simulations_total",
                "Number of completed simulation runs"
            )
            .expect("Failed to register simulations_run"),

            hours_simulated: register_int_counter!(
                "battery_guardian_hours_simulated_total",
                "Number of simulated hours across all runs"
            )
            .expect("Failed to register hours_simulated"),

            actions_applied: register_int_counter_vec!(
                "battery_guardian_actions_applied_total",
                "Optimization actions applied, by agent",
                &["agent"]
            )
            .expect("Failed to register actions_applied"),
        }
    }
}

/// Lightweight handle to the global simulation metrics
///
/// Clones share the same underlying metrics.
#[derive(Clone)]
pub struct SimulationMetrics {
    _private: (),
}

impl Default for SimulationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(SimulationMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &SimulationMetricsInner {
        GLOBAL_METRICS.get_or_init(SimulationMetricsInner::new)
    }

    pub fn observe_fit_latency(&self, duration_secs: f64) {
        self.inner().fit_latency_seconds.observe(duration_secs);
    }

    pub fn inc_forest_fits(&self) {
        self.inner().forest_fits.inc();
    }

    pub fn inc_fallback_fits(&self) {
        self.inner().fallback_fits.inc();
    }

    pub fn record_simulation(&self, hours: usize) {
        self.inner().simulations_run.inc();
        self.inner().hours_simulated.inc_by(hours as u64);
    }

    pub fn inc_action(&self, agent: &str) {
        self.inner()
            .actions_applied
            .with_label_values(&[agent])
            .inc();
    }

    pub fn simulations_run(&self) -> u64 {
        self.inner().simulations_run.get()
    }

    pub fn forest_fits(&self) -> u64 {
        self.inner().forest_fits.get()
    }

    pub fn fallback_fits(&self) -> u64 {
        self.inner().fallback_fits.get()
    }

    /// Render all registered metrics in the Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
            warn!(error = %e, "Failed to encode metrics");
            return String::new();
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

/// Structured logger for simulation events
#[derive(Clone)]
pub struct StructuredLogger {
    component: String,
}

impl StructuredLogger {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }

    pub fn log_usage_generated(&self, app: &str, hours: usize, seed: u64, noise: f64) {
        debug!(
            event = "usage_generated",
            component = %self.component,
            app = %app,
            hours = hours,
            seed = seed,
            noise = noise,
            "Generated synthetic usage trace"
        );
    }

    pub fn log_model_fitted(&self, kind: &str, rows: usize, elapsed_us: u128) {
        debug!(
            event = "model_fitted",
            component = %self.component,
            model_kind = %kind,
            rows = rows,
            elapsed_us = elapsed_us as u64,
            "Fitted drain model"
        );
    }

    pub fn log_fit_fallback(&self, reason: &str, rows: usize) {
        warn!(
            event = "fit_fallback",
            component = %self.component,
            reason = %reason,
            rows = rows,
            "Ensemble fit failed, using linear regression"
        );
    }

    pub fn log_simulation(
        &self,
        hours: usize,
        aggressiveness: f64,
        final_baseline_pct: f64,
        final_optimized_pct: f64,
        actions: usize,
    ) {
        info!(
            event = "simulation_completed",
            component = %self.component,
            hours = hours,
            aggressiveness = aggressiveness,
            final_baseline_pct = final_baseline_pct,
            final_optimized_pct = final_optimized_pct,
            actions = actions,
            "Simulated battery curves"
        );
    }

    pub fn log_savings(&self, battery_saved_pct: f64, extra_hours: u32) {
        info!(
            event = "savings_computed",
            component = %self.component,
            battery_saved_pct = battery_saved_pct,
            extra_hours_above_20pct = extra_hours,
            "Computed savings metrics"
        );
    }
}
