//! Turbofan RUL Trainer - Main Entry Point

use anyhow::{anyhow, Context};
use tracing::info;
use trainer::{init_logging, run_training, TrainerSettings};

fn main() -> anyhow::Result<()> {
    let settings = TrainerSettings::load().context("failed to load trainer settings")?;
    init_logging(&settings.log).map_err(|e| anyhow!(e))?;

    info!("=== Turbofan RUL Trainer v{} ===", env!("CARGO_PKG_VERSION"));

    let outcome = run_training(&settings)
        .with_context(|| format!("training on {} failed", settings.train_path))?;

    info!("Trained on {} examples", outcome.examples);
    if let Some(report) = outcome.evaluation {
        info!("Held-out RMSE {:.4}", report.rmse);
    }
    Ok(())
}
