//! Core library for the battery guardian simulator
//!
//! This crate provides the simulation pipeline:
//! - Synthetic per-hour usage generation for app profiles
//! - Drain-rate prediction (tree ensemble with linear fallback)
//! - Rule-based optimization actions
//! - Battery curve integration and savings metrics
//! - Context-aware tips and a keyword assistant

pub mod assistant;
pub mod catalog;
pub mod error;
pub mod generator;
pub mod models;
pub mod observability;
pub mod optimizer;
pub mod predictor;
pub mod savings;
pub mod simulator;

pub use catalog::{find_profile, sample_catalog};
pub use error::{FitError, GuardianError};
pub use generator::{generate, generate_usage, UsageConfig};
pub use models::*;
pub use observability::{SimulationMetrics, StructuredLogger};
pub use predictor::{fit_model, fit_model_with, predict_drain, DrainModel, PredictorConfig};
pub use savings::analyze_savings;
pub use simulator::{simulate, SimulationConfig};
