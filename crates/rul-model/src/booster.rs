//! Gradient Boosting Ensemble

use crate::binning::BinnedMatrix;
use crate::config::BoosterConfig;
use crate::metrics::rmse;
use crate::tree::{RegressionTree, TreeGrower, TreeParams};
use crate::ModelError;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Additive ensemble of regression trees on top of a constant base score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostedTrees {
    /// Initial prediction (mean training label)
    base_score: f64,
    /// Expected row width
    n_features: usize,
    trees: Vec<RegressionTree>,
}

impl GradientBoostedTrees {
    /// Assemble an ensemble from already fitted trees
    pub fn from_trees(
        base_score: f64,
        n_features: usize,
        trees: Vec<RegressionTree>,
    ) -> Result<Self, ModelError> {
        let ensemble = Self {
            base_score,
            n_features,
            trees,
        };
        ensemble.validate()?;
        Ok(ensemble)
    }

    /// Ensemble that always predicts `value`
    pub fn constant(value: f64, n_features: usize) -> Self {
        Self {
            base_score: value,
            n_features,
            trees: Vec::new(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate()?;
            if let Some(f) = tree.max_feature() {
                if f >= self.n_features {
                    return Err(ModelError::IncompatibleFormat(format!(
                        "tree {i} splits on feature {f} but the model has {} features",
                        self.n_features
                    )));
                }
            }
        }
        Ok(())
    }

    /// Fit the ensemble by minimising squared error
    pub fn train(
        rows: &[Vec<f64>],
        labels: &[f64],
        config: &BoosterConfig,
    ) -> Result<Self, ModelError> {
        config.validate()?;
        if rows.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        if rows.len() != labels.len() {
            return Err(ModelError::LabelMismatch {
                rows: rows.len(),
                labels: labels.len(),
            });
        }
        let n_features = rows[0].len();
        if n_features == 0 {
            return Err(ModelError::DimensionMismatch {
                expected: 1,
                actual: 0,
            });
        }
        if let Some(bad) = rows.iter().find(|r| r.len() != n_features) {
            return Err(ModelError::DimensionMismatch {
                expected: n_features,
                actual: bad.len(),
            });
        }

        let n_rows = rows.len();
        let sample_rows = fraction_of(n_rows, config.subsample);
        let sample_cols = fraction_of(n_features, config.colsample_bytree);
        info!(
            "Training {} trees on {} rows x {} features (rows/tree={}, cols/tree={})",
            config.n_estimators, n_rows, n_features, sample_rows, sample_cols
        );

        let data = BinnedMatrix::new(rows, n_features, config.max_bins);
        let base_score = labels.iter().sum::<f64>() / n_rows as f64;
        let params = TreeParams {
            max_depth: config.max_depth,
            min_samples_leaf: config.min_samples_leaf,
            l2_regularization: config.l2_regularization,
            min_split_gain: config.min_split_gain,
            learning_rate: config.learning_rate,
        };

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut predictions = vec![base_score; n_rows];
        let mut gradients = vec![0.0; n_rows];
        let mut trees = Vec::with_capacity(config.n_estimators);

        for round in 0..config.n_estimators {
            for ((g, p), y) in gradients.iter_mut().zip(&predictions).zip(labels) {
                *g = p - y;
            }

            let sampled_rows = sorted_sample(&mut rng, n_rows, sample_rows);
            let features = sorted_sample(&mut rng, n_features, sample_cols);

            let tree = TreeGrower::new(&data, &gradients, &features, params).grow(sampled_rows);
            for (p, row) in predictions.iter_mut().zip(rows) {
                *p += tree.predict(row);
            }
            trees.push(tree);

            if (round + 1) % 50 == 0 {
                debug!(
                    "Round {}/{}: train RMSE {:.4}",
                    round + 1,
                    config.n_estimators,
                    rmse(&predictions, labels).unwrap_or(f64::NAN)
                );
            }
        }

        Ok(Self {
            base_score,
            n_features,
            trees,
        })
    }

    /// Predict one row
    pub fn predict_row(&self, row: &[f64]) -> Result<f64, ModelError> {
        if row.len() != self.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features,
                actual: row.len(),
            });
        }
        Ok(self.base_score + self.trees.iter().map(|t| t.predict(row)).sum::<f64>())
    }

    /// Predict many rows
    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        rows.iter().map(|r| self.predict_row(r)).collect()
    }

    /// Expected row width
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Number of trees
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Initial prediction
    pub fn base_score(&self) -> f64 {
        self.base_score
    }
}

fn fraction_of(n: usize, fraction: f64) -> usize {
    ((n as f64 * fraction).round() as usize).clamp(1, n)
}

fn sorted_sample(rng: &mut StdRng, length: usize, amount: usize) -> Vec<usize> {
    if amount >= length {
        return (0..length).collect();
    }
    let mut picked = index::sample(rng, length, amount).into_vec();
    picked.sort_unstable();
    picked
}
