//! Drain-rate prediction engine

mod features;
mod forest;
mod linear;

pub use features::{
    build_training_set, heuristic_target, DrainFeatures, HEURISTIC_INTERCEPT, HEURISTIC_WEIGHTS,
    NUM_FEATURES,
};
pub use forest::{ForestRegressor, RegressionTree};
pub use linear::LinearRegressor;

use crate::models::UsageSample;
use crate::observability::{SimulationMetrics, StructuredLogger};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Trait for drain regressors
pub trait Regressor: Send + Sync {
    /// Predict the drain rate (%/h) for one row of features
    fn predict_features(&self, features: &DrainFeatures) -> f64;

    /// Short name of the algorithm, for logs
    fn kind(&self) -> &'static str;
}

/// Configuration for the primary ensemble regressor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Number of trees in the ensemble
    pub n_estimators: usize,
    /// Seed for bootstrap resampling
    pub seed: u64,
    /// Nodes with fewer rows become leaves
    pub min_samples_split: usize,
    /// Optional depth cap; unbounded by default
    pub max_depth: Option<usize>,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            n_estimators: 150,
            seed: 0,
            min_samples_split: 2,
            max_depth: None,
        }
    }
}

/// A fitted drain model
///
/// The model is read-only after fitting; prediction never retrains.
#[derive(Debug, Clone)]
pub enum DrainModel {
    Forest(ForestRegressor),
    Linear(LinearRegressor),
}

impl DrainModel {
    pub fn predict_sample(&self, sample: &UsageSample) -> f64 {
        self.predict_features(&DrainFeatures::from_sample(sample))
    }
}

impl Regressor for DrainModel {
    fn predict_features(&self, features: &DrainFeatures) -> f64 {
        match self {
            DrainModel::Forest(m) => m.predict_features(features),
            DrainModel::Linear(m) => m.predict_features(features),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            DrainModel::Forest(m) => m.kind(),
            DrainModel::Linear(m) => m.kind(),
        }
    }
}

/// Fit a drain model with the default ensemble configuration
pub fn fit_model(trace: &[UsageSample]) -> DrainModel {
    fit_model_with(trace, &PredictorConfig::default())
}

/// Fit the ensemble, falling back to least squares if it refuses the data
pub fn fit_model_with(trace: &[UsageSample], config: &PredictorConfig) -> DrainModel {
    let start = Instant::now();
    let metrics = SimulationMetrics::new();
    let logger = StructuredLogger::new("predictor");
    let (x, y) = build_training_set(trace);

    let model = match ForestRegressor::fit(&x, &y, config) {
        Ok(forest) => {
            metrics.inc_forest_fits();
            DrainModel::Forest(forest)
        }
        Err(err) => {
            logger.log_fit_fallback(&err.to_string(), x.len());
            metrics.inc_fallback_fits();
            DrainModel::Linear(LinearRegressor::fit(&x, &y))
        }
    };

    let elapsed = start.elapsed();
    metrics.observe_fit_latency(elapsed.as_secs_f64());
    logger.log_model_fitted(model.kind(), x.len(), elapsed.as_micros());
    model
}

/// Predict one drain rate per row, in row order
pub fn predict_drain(model: &DrainModel, trace: &[UsageSample]) -> Vec<f64> {
    trace.iter().map(|s| model.predict_sample(s)).collect()
}
