//! Startup loading

use crate::settings::ServerSettings;
use crate::AppState;
use inference_engine::ServingContext;
use rul_model::RulModel;
use sensor_table::{load_ground_truth, SensorTable};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Load model, sensor table and ground truth, then evaluate accuracy once.
///
/// Never fails: each input is recorded as its own component state.
pub fn load_context(settings: &ServerSettings) -> ServingContext {
    let started = Instant::now();
    let data = &settings.data;

    let context = ServingContext::assemble(
        RulModel::load(&data.model_path),
        SensorTable::load(&data.test_data_path),
        load_ground_truth(&data.ground_truth_path),
        settings.inference.clone(),
        settings.labels,
    );

    if let Some(report) = context.accuracy.ready() {
        info!(
            "Accuracy: RMSE {:.4} over {} engines ({} skipped)",
            report.rmse, report.evaluated, report.skipped
        );
    }
    info!("Startup loading finished in {:?}", started.elapsed());
    context
}

/// Load on a blocking task and publish the result into `state`
pub fn spawn_loader(state: Arc<AppState>, settings: ServerSettings) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        let context = load_context(&settings);
        if !state.install(context) {
            error!("Serving context was already installed; discarding reload");
        }
    })
}
