//! RUL Regression Model
//!
//! Gradient-boosted regression trees trained on squared error, bundled with
//! the ordered feature names they were fitted on.

mod artifact;
mod binning;
mod booster;
mod config;
mod metrics;
mod model;
mod tree;

pub use artifact::{ARTIFACT_FORMAT, ARTIFACT_VERSION};
pub use booster::GradientBoostedTrees;
pub use config::BoosterConfig;
pub use metrics::rmse;
pub use model::RulModel;
pub use tree::{Node, RegressionTree};

use thiserror::Error;

/// Errors while training, loading or evaluating a model
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Incompatible model format: {0}")]
    IncompatibleFormat(String),
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Training set is empty")]
    EmptyTrainingSet,
    #[error("Row/label count mismatch: {rows} rows, {labels} labels")]
    LabelMismatch { rows: usize, labels: usize },
    #[error("Invalid input shape: expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
