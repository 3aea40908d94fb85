//! Inference Engine Implementation

use crate::config::InferenceConfig;
use crate::InferenceError;
use feature_engine::FeatureVector;
use rul_model::RulModel;
use sensor_table::SensorTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Operating status tier derived from safe RUL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngineStatus {
    /// End of life, maintenance due
    Completed,
    /// Degrading, monitor closely
    Pending,
    /// Nominal operation
    InProgress,
}

impl EngineStatus {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineStatus::Completed => "completed",
            EngineStatus::Pending => "pending",
            EngineStatus::InProgress => "in-progress",
        }
    }
}

/// Result of analysing one engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineAnalysis {
    pub engine_id: u32,
    /// Unadjusted model output, may be negative
    pub raw_rul: f64,
    /// Raw RUL after the safety factor, truncated toward zero
    pub safe_rul: i64,
    /// 0-100, one decimal
    pub health_score: f64,
    pub status: EngineStatus,
    /// Cycle of the snapshot the prediction was made from
    pub current_cycle: u32,
    /// Raw values of the configured key sensors, keyed by label
    pub key_sensors: BTreeMap<String, f64>,
}

/// Stateless post-processing over a trained model
#[derive(Debug, Clone, Default)]
pub struct InferenceEngine {
    config: InferenceConfig,
}

impl InferenceEngine {
    /// Create a new inference engine
    pub fn new(config: InferenceConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Analyse the latest snapshot of an engine
    pub fn analyze(
        &self,
        engine_id: u32,
        model: &RulModel,
        table: &SensorTable,
    ) -> Result<EngineAnalysis, InferenceError> {
        let snapshot = table
            .snapshot(engine_id)
            .ok_or(InferenceError::EngineNotFound(engine_id))?;

        let features = FeatureVector::from_reading(snapshot, model.features())?;
        let raw_rul = model.predict_one(&features.values)?;

        let safe_rul = self.safe_rul(raw_rul);
        let health_score = self.health_score(safe_rul);
        let status = self.classify(safe_rul);

        let mut key_sensors = BTreeMap::new();
        for sensor in &self.config.key_sensors {
            match snapshot.value(&sensor.column) {
                Some(v) => {
                    key_sensors.insert(sensor.label.clone(), v);
                }
                None => warn!("Key sensor column {} does not exist", sensor.column),
            }
        }

        debug!(
            "Engine {} cycle {}: raw={:.2} safe={} health={:.1} status={}",
            engine_id,
            snapshot.cycle,
            raw_rul,
            safe_rul,
            health_score,
            status.as_str()
        );

        Ok(EngineAnalysis {
            engine_id,
            raw_rul,
            safe_rul,
            health_score,
            status,
            current_cycle: snapshot.cycle,
            key_sensors,
        })
    }

    /// Apply the safety factor and truncate toward zero
    pub fn safe_rul(&self, raw_rul: f64) -> i64 {
        (raw_rul * self.config.safety_factor) as i64
    }

    /// Safe RUL relative to the ceiling, clamped to 0-100 and rounded to 0.1
    pub fn health_score(&self, safe_rul: i64) -> f64 {
        let score = (safe_rul as f64 / self.config.rul_ceiling * 100.0).clamp(0.0, 100.0);
        (score * 10.0).round() / 10.0
    }

    /// Map safe RUL to a status tier
    pub fn classify(&self, safe_rul: i64) -> EngineStatus {
        if safe_rul < self.config.critical_below {
            EngineStatus::Completed
        } else if safe_rul < self.config.warning_below {
            EngineStatus::Pending
        } else {
            EngineStatus::InProgress
        }
    }
}
