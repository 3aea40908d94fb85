//! Server settings
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `RUL_*` environment variables (`__` separates nested keys, e.g.
//! `RUL_DATA__MODEL_PATH`).

use crate::rate_limit::RateLimitConfig;
use config::{Config, ConfigError, Environment, File};
use feature_engine::LabelPolicy;
use inference_engine::InferenceConfig;
use serde::{Deserialize, Serialize};
use telemetry::LogSettings;

/// Environment variable naming the settings file
pub const CONFIG_PATH_VAR: &str = "RUL_CONFIG";

/// Settings file used when `RUL_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "rul.toml";

/// Files loaded once at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    pub model_path: String,
    pub test_data_path: String,
    pub ground_truth_path: String,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            model_path: "rul_model.json".to_string(),
            test_data_path: "test_FD001.txt".to_string(),
            ground_truth_path: "RUL_FD001.txt".to_string(),
        }
    }
}

/// Top-level server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_addr: String,
    pub data: DataPaths,
    pub inference: InferenceConfig,
    /// Clipping applied to ground truth before scoring
    pub labels: LabelPolicy,
    /// Allow any origin, method and header
    pub cors_permissive: bool,
    pub rate_limit: RateLimitConfig,
    pub log: LogSettings,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            data: DataPaths::default(),
            inference: InferenceConfig::default(),
            labels: LabelPolicy::default(),
            cors_permissive: true,
            rate_limit: RateLimitConfig::default(),
            log: LogSettings::default(),
        }
    }
}

impl ServerSettings {
    /// Load from the file named by `RUL_CONFIG` (or `rul.toml`) and the environment
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
            .try_deserialize::<Self>()?
            .validated()
    }

    /// Health scoring and ground-truth clipping must share the training ceiling
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.inference.rul_ceiling != self.labels.ceiling {
            return Err(ConfigError::Message(format!(
                "inference.rul_ceiling ({}) must equal labels.ceiling ({})",
                self.inference.rul_ceiling, self.labels.ceiling
            )));
        }
        if self.labels.ceiling.is_nan() || self.labels.ceiling <= 0.0 {
            return Err(ConfigError::Message(format!(
                "labels.ceiling must be positive, got {}",
                self.labels.ceiling
            )));
        }
        Ok(self)
    }
}
