//! Trainer settings

use config::{Config, ConfigError, Environment, File};
use feature_engine::FeatureConfig;
use rul_model::BoosterConfig;
use serde::{Deserialize, Serialize};
use telemetry::LogSettings;

/// Environment variable naming the settings file
pub const CONFIG_PATH_VAR: &str = "RUL_TRAIN_CONFIG";

/// Settings file used when `RUL_TRAIN_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "rul-train.toml";

/// Held-out data scored after training
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationPaths {
    pub test_path: String,
    pub ground_truth_path: String,
}

impl Default for EvaluationPaths {
    fn default() -> Self {
        Self {
            test_path: "test_FD001.txt".to_string(),
            ground_truth_path: "RUL_FD001.txt".to_string(),
        }
    }
}

/// Top-level trainer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerSettings {
    /// Run-to-failure histories
    pub train_path: String,
    /// Where the artifact is written
    pub model_path: String,
    pub features: FeatureConfig,
    pub booster: BoosterConfig,
    /// Skipped when absent
    pub evaluation: Option<EvaluationPaths>,
    pub log: LogSettings,
}

impl Default for TrainerSettings {
    fn default() -> Self {
        Self {
            train_path: "train_FD001.txt".to_string(),
            model_path: "rul_model.json".to_string(),
            features: FeatureConfig::default(),
            booster: BoosterConfig::default(),
            evaluation: Some(EvaluationPaths::default()),
            log: LogSettings::default(),
        }
    }
}

impl TrainerSettings {
    /// Load from the file named by `RUL_TRAIN_CONFIG` (or `rul-train.toml`) and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load from an explicit file path; a missing file falls back to defaults
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("RUL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
