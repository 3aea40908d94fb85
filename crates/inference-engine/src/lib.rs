//! RUL Inference Engine
//!
//! Converts raw model output into a safety-adjusted RUL, a health score and a
//! status tier, and measures raw model accuracy against ground truth.

mod config;
mod context;
mod engine;
mod evaluator;

pub use config::{InferenceConfig, KeySensor};
pub use context::{Component, ServingContext};
pub use engine::{EngineAnalysis, EngineStatus, InferenceEngine};
pub use evaluator::{AccuracyEvaluator, AccuracyReport};

use feature_engine::FeatureError;
use rul_model::ModelError;
use thiserror::Error;

/// Errors during inference or evaluation
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Engine {0} not found")]
    EngineNotFound(u32),
    #[error("System unavailable: {0}")]
    SystemUnavailable(String),
    #[error("Feature selection failed: {0}")]
    Feature(#[from] FeatureError),
    #[error("Model evaluation failed: {0}")]
    Model(#[from] ModelError),
    #[error("No ground-truth entry matched an engine in the sensor table")]
    NoEvaluablePairs,
}
