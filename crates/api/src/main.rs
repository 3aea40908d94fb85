//! Turbofan RUL Server - Main Entry Point

use anyhow::{anyhow, Context};
use api::{init_logging, run_server, ServerSettings};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = ServerSettings::load().context("failed to load server settings")?;
    init_logging(&settings.log).map_err(|e| anyhow!(e))?;

    info!("=== Turbofan RUL Server v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "Model: {}, test data: {}, ground truth: {}",
        settings.data.model_path, settings.data.test_data_path, settings.data.ground_truth_path
    );

    run_server(settings)
        .await
        .map_err(|e| anyhow!("server error: {}", e))?;

    Ok(())
}
