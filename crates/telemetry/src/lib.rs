//! Telemetry
//!
//! `tracing` subscriber setup shared by the server and the trainer.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Logging output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl LogSettings {
    /// Filter from `RUST_LOG`, falling back to the configured level
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }
}

/// Install the global subscriber; fails if one is already set
pub fn init_logging(settings: &LogSettings) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(settings.filter())
        .with_target(true);

    if settings.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
}
