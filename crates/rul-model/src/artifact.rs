//! Model Artifact Persistence
//!
//! A model is persisted as a JSON bundle carrying a format tag, a version, the
//! ordered feature names and the fitted ensemble. Anything else (including a
//! bare ensemble without feature names) is rejected on load.

use crate::booster::GradientBoostedTrees;
use crate::model::RulModel;
use crate::ModelError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::info;

/// Format tag written into every bundle
pub const ARTIFACT_FORMAT: &str = "rul-gbt";

/// Newest bundle layout this build understands
pub const ARTIFACT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct ModelBundle {
    format: String,
    version: u32,
    features: Vec<String>,
    model: GradientBoostedTrees,
}

impl RulModel {
    /// Serialise to the bundle layout
    pub fn to_json(&self) -> Result<String, ModelError> {
        let bundle = ModelBundle {
            format: ARTIFACT_FORMAT.to_string(),
            version: ARTIFACT_VERSION,
            features: self.features().to_vec(),
            model: self.ensemble().clone(),
        };
        Ok(serde_json::to_string(&bundle)?)
    }

    /// Parse a bundle, rejecting legacy or foreign layouts
    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| ModelError::IncompatibleFormat(format!("not a JSON document: {e}")))?;

        let Some(obj) = value.as_object() else {
            return Err(ModelError::IncompatibleFormat(
                "bundle is not an object (legacy format)".into(),
            ));
        };
        for key in ["model", "features"] {
            if !obj.contains_key(key) {
                return Err(ModelError::IncompatibleFormat(format!(
                    "bundle has no `{key}` entry (legacy format)"
                )));
            }
        }
        match obj.get("format").and_then(Value::as_str) {
            Some(ARTIFACT_FORMAT) => {}
            other => {
                return Err(ModelError::IncompatibleFormat(format!(
                    "unknown format tag {other:?}"
                )))
            }
        }
        match obj.get("version").and_then(Value::as_u64) {
            Some(v) if v >= 1 && v <= ARTIFACT_VERSION as u64 => {}
            other => {
                return Err(ModelError::IncompatibleFormat(format!(
                    "unsupported bundle version {other:?}"
                )))
            }
        }

        let bundle: ModelBundle = serde_json::from_value(value)
            .map_err(|e| ModelError::IncompatibleFormat(e.to_string()))?;
        RulModel::new(bundle.features, bundle.model)
    }

    /// Write the bundle to disk
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ModelError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!(
            "Saved model ({} trees, {} features) to {}",
            self.ensemble().n_trees(),
            self.features().len(),
            path.display()
        );
        Ok(())
    }

    /// Read a bundle from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let model = Self::from_json(&text)?;
        info!(
            "Loaded model ({} trees, features {:?}) from {}",
            model.ensemble().n_trees(),
            model.features(),
            path.display()
        );
        Ok(model)
    }
}
