//! Error types for the simulation core

use thiserror::Error;

/// Errors surfaced to callers of the simulation core
#[derive(Debug, Error, PartialEq)]
pub enum GuardianError {
    #[error("unknown app profile: {0}")]
    UnknownProfile(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Reasons the primary regressor can refuse to fit
///
/// These never leave the predictor: `fit_model` recovers by fitting the
/// linear fallback instead.
#[derive(Debug, Error, PartialEq)]
pub enum FitError {
    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("ensemble configured with zero estimators")]
    NoEstimators,

    #[error("non-finite feature or target at row {row}")]
    NonFiniteInput { row: usize },
}

pub type Result<T> = std::result::Result<T, GuardianError>;
