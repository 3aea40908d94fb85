//! Immutable Serving Context
//!
//! Everything a query needs, assembled once at startup. Each input is an
//! independent component: a failed sensor-data load leaves the model reported
//! as loaded, and queries fail with `SystemUnavailable` instead of touching
//! partially initialised state.

use crate::config::InferenceConfig;
use crate::engine::{EngineAnalysis, InferenceEngine};
use crate::evaluator::{AccuracyEvaluator, AccuracyReport};
use crate::InferenceError;
use feature_engine::LabelPolicy;
use rul_model::RulModel;
use sensor_table::{GroundTruthEntry, SensorTable};
use std::fmt::Display;
use tracing::{error, info};

/// Load state of one startup component
#[derive(Debug, Clone)]
pub enum Component<T> {
    Ready(T),
    Failed(String),
}

impl<T> Component<T> {
    /// Record a load result, logging failures
    pub fn from_result<E: Display>(name: &str, result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Component::Ready(value),
            Err(e) => {
                error!("{} failed to load: {}", name, e);
                Component::Failed(e.to_string())
            }
        }
    }

    /// Loaded value, if any
    pub fn ready(&self) -> Option<&T> {
        match self {
            Component::Ready(value) => Some(value),
            Component::Failed(_) => None,
        }
    }

    /// Failure reason, if any
    pub fn failure(&self) -> Option<&str> {
        match self {
            Component::Ready(_) => None,
            Component::Failed(reason) => Some(reason.as_str()),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Component::Ready(_))
    }
}

/// Read-only state shared by every query for the life of the server
#[derive(Debug)]
pub struct ServingContext {
    pub model: Component<RulModel>,
    pub sensors: Component<SensorTable>,
    /// Accuracy of the raw model on the held-out table, computed once
    pub accuracy: Component<AccuracyReport>,
    engine: InferenceEngine,
}

impl ServingContext {
    /// Assemble the context from independent load results.
    ///
    /// Accuracy is evaluated here, once; it needs the model, the sensor table
    /// and the ground truth to all be present.
    pub fn assemble<EM, ES, EG>(
        model: Result<RulModel, EM>,
        sensors: Result<SensorTable, ES>,
        ground_truth: Result<Vec<GroundTruthEntry>, EG>,
        config: InferenceConfig,
        label_policy: LabelPolicy,
    ) -> Self
    where
        EM: Display,
        ES: Display,
        EG: Display,
    {
        let model = Component::from_result("Model", model);
        let sensors = Component::from_result("Sensor table", sensors);
        let ground_truth = Component::from_result("Ground truth", ground_truth);

        let accuracy = match (model.ready(), sensors.ready(), ground_truth.ready()) {
            (Some(m), Some(s), Some(g)) => Component::from_result(
                "Accuracy evaluation",
                AccuracyEvaluator::new(label_policy).evaluate(m, s, g),
            ),
            _ => Component::Failed("model, sensor table or ground truth unavailable".into()),
        };

        info!(
            "Serving context ready: model={} sensors={} accuracy={}",
            model.is_ready(),
            sensors.is_ready(),
            accuracy.is_ready()
        );

        Self {
            model,
            sensors,
            accuracy,
            engine: InferenceEngine::new(config),
        }
    }

    /// Analyse an engine against the loaded model and table
    pub fn analyze(&self, engine_id: u32) -> Result<EngineAnalysis, InferenceError> {
        let model = self.model.ready().ok_or_else(|| {
            InferenceError::SystemUnavailable(format!(
                "model not loaded: {}",
                self.model.failure().unwrap_or_default()
            ))
        })?;
        let table = self.sensors.ready().ok_or_else(|| {
            InferenceError::SystemUnavailable(format!(
                "sensor data not loaded: {}",
                self.sensors.failure().unwrap_or_default()
            ))
        })?;
        self.engine.analyze(engine_id, model, table)
    }

    /// Cached RMSE, if evaluation succeeded
    pub fn rmse(&self) -> Option<f64> {
        self.accuracy.ready().map(|a| a.rmse)
    }

    /// Whether queries can be served
    pub fn is_ready(&self) -> bool {
        self.model.is_ready() && self.sensors.is_ready()
    }

    /// Post-processing engine
    pub fn engine(&self) -> &InferenceEngine {
        &self.engine
    }
}
