//! Health endpoint

use crate::AppState;
use axum::{extract::State, Json};
use inference_engine::Component;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `starting`, `healthy`, `degraded` or `unavailable`
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: ComponentStatus,
    pub metrics: SystemMetrics,
}

/// Component status
#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentStatus {
    pub model: ComponentHealth,
    pub sensor_data: ComponentHealth,
    pub accuracy: ComponentHealth,
}

/// Individual component health
#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// `ok`, `failed` or `pending`
    pub status: String,
    pub detail: Option<String>,
}

impl ComponentHealth {
    fn pending() -> Self {
        Self {
            status: "pending".to_string(),
            detail: None,
        }
    }

    fn of<T>(component: &Component<T>) -> Self {
        match component.failure() {
            None => Self {
                status: "ok".to_string(),
                detail: None,
            },
            Some(reason) => Self {
                status: "failed".to_string(),
                detail: Some(reason.to_string()),
            },
        }
    }
}

/// System metrics
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SystemMetrics {
    pub engine_count: usize,
    pub reading_count: usize,
    pub feature_count: usize,
    pub rmse: Option<f64>,
}

/// GET /api/v1/health
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let (status, components, metrics) = match state.context() {
        None => (
            "starting",
            ComponentStatus {
                model: ComponentHealth::pending(),
                sensor_data: ComponentHealth::pending(),
                accuracy: ComponentHealth::pending(),
            },
            SystemMetrics::default(),
        ),
        Some(ctx) => {
            let status = if !ctx.is_ready() {
                "unavailable"
            } else if ctx.accuracy.is_ready() {
                "healthy"
            } else {
                "degraded"
            };
            let table = ctx.sensors.ready();
            (
                status,
                ComponentStatus {
                    model: ComponentHealth::of(&ctx.model),
                    sensor_data: ComponentHealth::of(&ctx.sensors),
                    accuracy: ComponentHealth::of(&ctx.accuracy),
                },
                SystemMetrics {
                    engine_count: table.map_or(0, |t| t.engine_count()),
                    reading_count: table.map_or(0, |t| t.len()),
                    feature_count: ctx.model.ready().map_or(0, |m| m.features().len()),
                    rmse: ctx.rmse(),
                },
            )
        }
    };

    Json(HealthResponse {
        status: status.to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        components,
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{app, get_json, model, ready_state, state_with, table};
    use axum::http::StatusCode;
    use rul_model::ModelError;
    use sensor_table::{GroundTruthEntry, SensorTable, TableError};

    #[tokio::test]
    async fn test_healthy() {
        let (status, body): (_, HealthResponse) = get_json(app(ready_state(60.0)), "/api/v1/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "healthy");
        assert_eq!(body.components.model.status, "ok");
        assert_eq!(body.components.accuracy.status, "ok");
        assert_eq!(body.metrics.engine_count, 2);
        assert_eq!(body.metrics.reading_count, 5);
        assert_eq!(body.metrics.feature_count, 2);
        assert!(body.metrics.rmse.is_some());
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_starting() {
        let state = Arc::new(AppState::new(None));
        let (_, body): (_, HealthResponse) = get_json(app(state), "/api/v1/health").await;
        assert_eq!(body.status, "starting");
        assert_eq!(body.components.sensor_data.status, "pending");
    }

    #[tokio::test]
    async fn test_data_failure_keeps_model_reported_loaded() {
        let state = state_with(
            Ok::<_, ModelError>(model(40.0)),
            Err::<SensorTable, _>(TableError::Empty),
            Ok::<_, TableError>(vec![GroundTruthEntry { engine_id: 1, actual_rul: 10.0 }]),
        );
        let (_, body): (_, HealthResponse) = get_json(app(state), "/api/v1/health").await;

        assert_eq!(body.status, "unavailable");
        assert_eq!(body.components.model.status, "ok");
        assert_eq!(body.components.sensor_data.status, "failed");
        assert!(body.components.sensor_data.detail.is_some());
        assert_eq!(body.metrics.rmse, None);
    }

    #[tokio::test]
    async fn test_accuracy_failure_is_degraded() {
        let state = state_with(
            Ok::<_, ModelError>(model(40.0)),
            Ok::<_, TableError>(table()),
            Err::<Vec<GroundTruthEntry>, _>(TableError::Empty),
        );
        let (_, body): (_, HealthResponse) = get_json(app(state), "/api/v1/health").await;
        assert_eq!(body.status, "degraded");
        assert_eq!(body.components.accuracy.status, "failed");
    }
}
