//! Feature Engineering Engine
//!
//! Turns run-to-failure sensor histories into a supervised training table and
//! selects model inputs from live readings.

mod features;
mod labels;

pub use features::{
    FeatureConfig, FeatureLabelBuilder, FeatureVector, TrainingTable, DEFAULT_DENYLIST,
};
pub use labels::{LabelPolicy, RUL_CEILING};

use thiserror::Error;

/// Errors during feature selection
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("Unknown feature column: {0}")]
    UnknownColumn(String),
    #[error("Feature set is empty after applying the denylist")]
    NoFeatures,
}
