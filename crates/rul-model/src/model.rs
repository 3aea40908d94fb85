//! Trained Model: Ensemble Plus Feature Contract

use crate::booster::GradientBoostedTrees;
use crate::config::BoosterConfig;
use crate::ModelError;
use std::time::Instant;
use tracing::info;

/// A fitted regressor and the ordered feature names it expects.
///
/// Row values passed to [`RulModel::predict_one`] must follow
/// [`RulModel::features`] exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct RulModel {
    features: Vec<String>,
    ensemble: GradientBoostedTrees,
}

impl RulModel {
    /// Pair an ensemble with its feature names
    pub fn new(features: Vec<String>, ensemble: GradientBoostedTrees) -> Result<Self, ModelError> {
        if features.len() != ensemble.n_features() {
            return Err(ModelError::IncompatibleFormat(format!(
                "{} feature names for an ensemble expecting {}",
                features.len(),
                ensemble.n_features()
            )));
        }
        ensemble.validate()?;
        Ok(Self { features, ensemble })
    }

    /// Train a fresh model on a feature table
    pub fn train(
        features: Vec<String>,
        rows: &[Vec<f64>],
        labels: &[f64],
        config: &BoosterConfig,
    ) -> Result<Self, ModelError> {
        let start = Instant::now();
        let ensemble = GradientBoostedTrees::train(rows, labels, config)?;
        let model = Self::new(features, ensemble)?;

        info!(
            "Training finished in {:.1}s: {} trees",
            start.elapsed().as_secs_f64(),
            model.ensemble.n_trees()
        );
        Ok(model)
    }

    /// Ordered feature names
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Underlying ensemble
    pub fn ensemble(&self) -> &GradientBoostedTrees {
        &self.ensemble
    }

    /// Raw prediction for one row laid out as [`RulModel::features`]
    pub fn predict_one(&self, row: &[f64]) -> Result<f64, ModelError> {
        self.ensemble.predict_row(row)
    }

    /// Raw predictions, one per row
    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        self.ensemble.predict(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("s{}", i + 1)).collect()
    }

    #[test]
    fn test_feature_count_must_match() {
        let ensemble = GradientBoostedTrees::constant(10.0, 3);
        assert!(RulModel::new(names(2), ensemble.clone()).is_err());
        let model = RulModel::new(names(3), ensemble).unwrap();
        assert_eq!(model.features(), ["s1", "s2", "s3"]);
    }

    #[test]
    fn test_train_and_predict() {
        let rows: Vec<Vec<f64>> = (0..100).map(|i| vec![i as f64]).collect();
        let labels: Vec<f64> = (0..100).map(|i| if i < 50 { 100.0 } else { 20.0 }).collect();
        let config = BoosterConfig {
            n_estimators: 50,
            learning_rate: 0.3,
            subsample: 1.0,
            colsample_bytree: 1.0,
            ..Default::default()
        };

        let model = RulModel::train(names(1), &rows, &labels, &config).unwrap();
        let preds = model.predict(&[vec![10.0], vec![90.0]]).unwrap();
        assert!((preds[0] - 100.0).abs() < 1.0);
        assert!((preds[1] - 20.0).abs() < 1.0);
    }
}
