//! RUL Trainer
//!
//! Offline pipeline: load run-to-failure histories, build the feature/label
//! table, fit the boosted ensemble, persist the artifact and optionally score
//! it on held-out data with the same evaluator the server uses.

use feature_engine::{FeatureError, FeatureLabelBuilder};
use inference_engine::{AccuracyEvaluator, AccuracyReport, InferenceError};
use rul_model::{rmse, ModelError, RulModel};
use sensor_table::{load_ground_truth, SensorTable, TableError};
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

mod settings;

pub use settings::{EvaluationPaths, TrainerSettings, CONFIG_PATH_VAR, DEFAULT_CONFIG_PATH};
pub use telemetry::{init_logging, LogSettings};

/// Training pipeline errors
#[derive(Debug, Error)]
pub enum TrainError {
    #[error("Training data error: {0}")]
    Table(#[from] TableError),

    #[error("Feature error: {0}")]
    Feature(#[from] FeatureError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Evaluation error: {0}")]
    Evaluation(#[from] InferenceError),
}

/// What a training run produced
#[derive(Debug)]
pub struct TrainingOutcome {
    pub model: RulModel,
    /// Rows in the training table
    pub examples: usize,
    pub in_sample_rmse: f64,
    /// Held-out accuracy, when evaluation was configured and succeeded
    pub evaluation: Option<AccuracyReport>,
}

/// Train, persist, then evaluate.
///
/// Evaluation runs after the artifact is written, so its failure is logged
/// and does not fail the run.
pub fn run_training(settings: &TrainerSettings) -> Result<TrainingOutcome, TrainError> {
    let started = Instant::now();

    let history = SensorTable::load(&settings.train_path)?;
    let builder = FeatureLabelBuilder::new(&settings.features)?;
    let table = builder.build(&history)?;
    info!(
        "Training on {} examples x {} features: {:?}",
        table.len(),
        table.columns.len(),
        table.columns
    );

    let model = RulModel::train(
        table.columns.clone(),
        &table.rows,
        &table.labels,
        &settings.booster,
    )?;
    let fitted = model.predict(&table.rows)?;
    let in_sample_rmse = rmse(&fitted, &table.labels).ok_or(ModelError::EmptyTrainingSet)?;
    info!("In-sample RMSE {:.4}", in_sample_rmse);

    model.save(&settings.model_path)?;
    info!("Model saved to {}", settings.model_path);

    let evaluation = match &settings.evaluation {
        Some(paths) => match evaluate(&model, paths, settings) {
            Ok(report) => Some(report),
            Err(e) => {
                warn!("Held-out evaluation skipped: {}", e);
                None
            }
        },
        None => None,
    };

    info!("Training run finished in {:?}", started.elapsed());
    Ok(TrainingOutcome {
        model,
        examples: table.len(),
        in_sample_rmse,
        evaluation,
    })
}

fn evaluate(
    model: &RulModel,
    paths: &EvaluationPaths,
    settings: &TrainerSettings,
) -> Result<AccuracyReport, TrainError> {
    let table = SensorTable::load(&paths.test_path)?;
    let ground_truth = load_ground_truth(&paths.ground_truth_path)?;
    let report =
        AccuracyEvaluator::new(settings.features.label).evaluate(model, &table, &ground_truth)?;
    info!(
        "Held-out RMSE {:.4} over {} engines ({} skipped)",
        report.rmse, report.evaluated, report.skipped
    );
    Ok(report)
}
