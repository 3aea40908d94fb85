//! Inference configuration

use feature_engine::RUL_CEILING;
use serde::{Deserialize, Serialize};

/// A sensor channel echoed back with every analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeySensor {
    /// Name in the response (e.g. `s11_pressure`)
    pub label: String,
    /// Source column (e.g. `s11`)
    pub column: String,
}

impl KeySensor {
    pub fn new(label: &str, column: &str) -> Self {
        Self {
            label: label.to_string(),
            column: column.to_string(),
        }
    }
}

/// Post-processing constants applied to raw predictions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Multiplier applied to the raw prediction before truncation
    pub safety_factor: f64,

    /// RUL that maps to a health score of 100
    pub rul_ceiling: f64,

    /// Safe RUL below this is end-of-life (`completed`)
    pub critical_below: i64,

    /// Safe RUL below this (and not critical) is degrading (`pending`)
    pub warning_below: i64,

    /// Raw channels included in every analysis
    pub key_sensors: Vec<KeySensor>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            safety_factor: 0.80,
            rul_ceiling: RUL_CEILING,
            critical_below: 20,
            warning_below: 60,
            key_sensors: vec![
                KeySensor::new("s11_pressure", "s11"),
                KeySensor::new("s14_speed", "s14"),
            ],
        }
    }
}
