//! Engine analysis endpoint

use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use inference_engine::{EngineAnalysis, EngineStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Analysis response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub engine_id: u32,
    /// Safe RUL in cycles
    pub rul: i64,
    /// Raw model output truncated toward zero
    pub raw_rul_prediction: i64,
    pub health_score: f64,
    pub current_cycle: u32,
    pub status: EngineStatus,
    /// Fleet-wide RMSE, null when evaluation failed
    pub rmse: Option<f64>,
    pub sensors: BTreeMap<String, f64>,
}

impl AnalysisResponse {
    pub fn new(analysis: &EngineAnalysis, rmse: Option<f64>) -> Self {
        Self {
            engine_id: analysis.engine_id,
            rul: analysis.safe_rul,
            raw_rul_prediction: analysis.raw_rul as i64,
            health_score: analysis.health_score,
            current_cycle: analysis.current_cycle,
            status: analysis.status,
            rmse: rmse.map(round2),
            sensors: analysis
                .key_sensors
                .iter()
                .map(|(label, value)| (label.clone(), round2(*value)))
                .collect(),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// GET /analyze/:engine_id
pub async fn analyze_engine(
    State(state): State<Arc<AppState>>,
    Path(engine_id): Path<String>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let started = Instant::now();
    let result = parse_engine_id(&engine_id).and_then(|id| analyze(&state, id));

    let outcome = match &result {
        Ok(_) => "ok",
        Err(e) => e.code(),
    };
    metrics::counter!("rul_analysis_requests_total", "outcome" => outcome).increment(1);
    metrics::histogram!("rul_analysis_duration_seconds").record(started.elapsed().as_secs_f64());

    result.map(Json)
}

/// Engine ids are positive integers that fit in `u32`
fn parse_engine_id(raw: &str) -> Result<u32, ApiError> {
    match raw.parse::<u32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::InvalidEngineId(raw.to_string())),
    }
}

fn analyze(state: &AppState, engine_id: u32) -> Result<AnalysisResponse, ApiError> {
    let context = state
        .context()
        .ok_or_else(|| ApiError::Unavailable("startup loading in progress".to_string()))?;

    let analysis = context.analyze(engine_id)?;
    debug!(
        "Analysed engine {}: rul={} status={}",
        engine_id,
        analysis.safe_rul,
        analysis.status.as_str()
    );
    Ok(AnalysisResponse::new(&analysis, context.rmse()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{app, get_json, ready_state};
    use axum::http::StatusCode;
    use crate::ErrorBody;

    #[tokio::test]
    async fn test_analyze_known_engine() {
        let (status, body): (_, AnalysisResponse) = get_json(app(ready_state(100.0)), "/analyze/1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.engine_id, 1);
        assert_eq!(body.rul, 80);
        assert_eq!(body.raw_rul_prediction, 100);
        assert_eq!(body.health_score, 64.0);
        assert_eq!(body.status, EngineStatus::InProgress);
        assert_eq!(body.current_cycle, 3);
        assert_eq!(body.sensors["s11_pressure"], 47.49);
        assert_eq!(body.sensors["s14_speed"], 8138.62);
        assert!(body.rmse.is_some());
    }

    #[tokio::test]
    async fn test_response_shape() {
        let (_, body): (_, serde_json::Value) = get_json(app(ready_state(100.0)), "/analyze/2").await;
        assert_eq!(body["status"], "in-progress");

        let mut keys: Vec<&str> = body
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            [
                "current_cycle",
                "engine_id",
                "health_score",
                "raw_rul_prediction",
                "rmse",
                "rul",
                "sensors",
                "status"
            ]
        );
    }

    #[tokio::test]
    async fn test_raw_prediction_truncates_toward_zero() {
        let (_, body): (_, AnalysisResponse) = get_json(app(ready_state(-7.9)), "/analyze/1").await;
        assert_eq!(body.raw_rul_prediction, -7);
        assert_eq!(body.rul, -6);
        assert_eq!(body.health_score, 0.0);
        assert_eq!(body.status, EngineStatus::Completed);
    }

    #[tokio::test]
    async fn test_unknown_engine_is_404() {
        let (status, body): (_, ErrorBody) = get_json(app(ready_state(50.0)), "/analyze/999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "engine_not_found");
    }

    #[tokio::test]
    async fn test_before_loading_is_503() {
        let state = Arc::new(AppState::new(None));
        let (status, body): (_, ErrorBody) = get_json(app(state), "/analyze/1").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.error, "system_unavailable");
    }

    #[tokio::test]
    async fn test_malformed_ids_are_json_400() {
        for uri in [
            "/analyze/0",
            "/analyze/abc",
            "/analyze/-1",
            "/analyze/99999999999",
            "/analyze/1.5",
        ] {
            let (status, body): (_, ErrorBody) = get_json(app(ready_state(50.0)), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body.error, "invalid_engine_id", "{uri}");
        }
    }

    #[tokio::test]
    async fn test_malformed_id_checked_before_readiness() {
        let state = Arc::new(AppState::new(None));
        let (status, _): (_, ErrorBody) = get_json(app(state), "/analyze/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_parse_engine_id() {
        assert_eq!(parse_engine_id("42").unwrap(), 42);
        assert!(parse_engine_id("").is_err());
        assert!(parse_engine_id("0").is_err());
        assert!(parse_engine_id("4294967296").is_err());
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round2(21.4567), 21.46);
        assert_eq!(round2(8138.624), 8138.62);
        assert_eq!(round2(-0.004), -0.0);
    }
}
