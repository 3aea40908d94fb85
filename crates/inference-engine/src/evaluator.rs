//! Accuracy Evaluation Against Ground Truth

use crate::InferenceError;
use feature_engine::{FeatureVector, LabelPolicy};
use rul_model::{rmse, RulModel};
use sensor_table::{GroundTruthEntry, SensorTable};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Outcome of an accuracy evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyReport {
    /// Root-mean-square error of raw predictions
    pub rmse: f64,
    /// Ground-truth entries paired with a snapshot
    pub evaluated: usize,
    /// Entries without a matching engine in the sensor table
    pub skipped: usize,
}

/// Measures raw model accuracy on each engine's last observed cycle.
///
/// The safety factor is not applied: this scores the regressor itself.
#[derive(Debug, Clone, Default)]
pub struct AccuracyEvaluator {
    policy: LabelPolicy,
}

impl AccuracyEvaluator {
    /// Create an evaluator clipping ground truth with `policy`
    pub fn new(policy: LabelPolicy) -> Self {
        Self { policy }
    }

    /// Pair raw predictions with clipped ground truth and compute RMSE.
    ///
    /// Entries whose engine has no snapshot are skipped, not counted.
    pub fn evaluate(
        &self,
        model: &RulModel,
        table: &SensorTable,
        ground_truth: &[GroundTruthEntry],
    ) -> Result<AccuracyReport, InferenceError> {
        let mut predictions = Vec::with_capacity(ground_truth.len());
        let mut actuals = Vec::with_capacity(ground_truth.len());

        for entry in ground_truth {
            let Some(snapshot) = table.snapshot(entry.engine_id) else {
                continue;
            };
            let features = FeatureVector::from_reading(snapshot, model.features())?;
            predictions.push(model.predict_one(&features.values)?);
            actuals.push(self.policy.clip(entry.actual_rul));
        }

        let skipped = ground_truth.len() - predictions.len();
        if skipped > 0 {
            warn!(
                "Skipped {} ground-truth entries with no matching engine",
                skipped
            );
        }

        let rmse = rmse(&predictions, &actuals).ok_or(InferenceError::NoEvaluablePairs)?;
        info!(
            "RMSE (raw predictions) over {} engines: {:.4}",
            predictions.len(),
            rmse
        );

        Ok(AccuracyReport {
            rmse,
            evaluated: predictions.len(),
            skipped,
        })
    }
}
