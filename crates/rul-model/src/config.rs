//! Booster Hyperparameters

use crate::ModelError;
use serde::{Deserialize, Serialize};

/// Gradient boosting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoosterConfig {
    /// Number of boosting rounds (trees)
    pub n_estimators: usize,
    /// Shrinkage applied to every tree's output
    pub learning_rate: f64,
    /// Maximum tree depth (root is depth 0)
    pub max_depth: usize,
    /// Fraction of rows sampled per tree
    pub subsample: f64,
    /// Fraction of feature columns sampled per tree
    pub colsample_bytree: f64,
    /// Minimum rows in each leaf
    pub min_samples_leaf: usize,
    /// L2 penalty on leaf weights
    pub l2_regularization: f64,
    /// Minimum loss reduction required to split
    pub min_split_gain: f64,
    /// Histogram bins per feature
    pub max_bins: usize,
    /// Seed for row and column sampling
    pub seed: u64,
}

impl Default for BoosterConfig {
    fn default() -> Self {
        Self {
            n_estimators: 300,
            learning_rate: 0.05,
            max_depth: 6,
            subsample: 0.8,
            colsample_bytree: 0.8,
            min_samples_leaf: 1,
            l2_regularization: 1.0,
            min_split_gain: 0.0,
            max_bins: 256,
            seed: 42,
        }
    }
}

impl BoosterConfig {
    /// Check ranges before training
    pub fn validate(&self) -> Result<(), ModelError> {
        let fraction = |name: &str, v: f64| {
            if v > 0.0 && v <= 1.0 {
                Ok(())
            } else {
                Err(ModelError::InvalidConfig(format!(
                    "{name} must be in (0, 1], got {v}"
                )))
            }
        };

        if self.n_estimators == 0 {
            return Err(ModelError::InvalidConfig("n_estimators must be > 0".into()));
        }
        if !(self.learning_rate > 0.0) {
            return Err(ModelError::InvalidConfig(format!(
                "learning_rate must be > 0, got {}",
                self.learning_rate
            )));
        }
        fraction("subsample", self.subsample)?;
        fraction("colsample_bytree", self.colsample_bytree)?;
        if self.min_samples_leaf == 0 {
            return Err(ModelError::InvalidConfig("min_samples_leaf must be > 0".into()));
        }
        if self.l2_regularization < 0.0 || self.min_split_gain < 0.0 {
            return Err(ModelError::InvalidConfig(
                "regularization terms must be non-negative".into(),
            ));
        }
        if !(2..=u16::MAX as usize).contains(&self.max_bins) {
            return Err(ModelError::InvalidConfig(format!(
                "max_bins must be in [2, {}], got {}",
                u16::MAX,
                self.max_bins
            )));
        }
        Ok(())
    }
}
