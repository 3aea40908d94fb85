//! API route handlers

pub mod analyze;
pub mod health;
pub mod metrics;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::{create_router, AppState, RateLimitConfig, ServerSettings};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use feature_engine::LabelPolicy;
    use inference_engine::{InferenceConfig, ServingContext};
    use rul_model::{GradientBoostedTrees, RulModel};
    use sensor_table::{GroundTruthEntry, SensorReading, SensorTable};
    use serde::de::DeserializeOwned;
    use std::fmt::Display;
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Model predicting `raw` for every engine
    pub fn model(raw: f64) -> RulModel {
        RulModel::new(
            vec!["s2".to_string(), "s11".to_string()],
            GradientBoostedTrees::constant(raw, 2),
        )
        .unwrap()
    }

    /// Engine 1 with three cycles, engine 2 with two
    pub fn table() -> SensorTable {
        let mut readings = Vec::new();
        for (engine_id, cycles) in [(1u32, 3u32), (2, 2)] {
            for cycle in 1..=cycles {
                let mut r = SensorReading {
                    engine_id,
                    cycle,
                    ..Default::default()
                };
                r.sensors[1] = 642.0;
                r.sensors[10] = 47.4 + cycle as f64 * 0.0304; // s11
                r.sensors[13] = 8138.624; // s14
                readings.push(r);
            }
        }
        SensorTable::from_readings(readings)
    }

    pub fn state_with<EM, ES, EG>(
        model: Result<RulModel, EM>,
        sensors: Result<SensorTable, ES>,
        ground_truth: Result<Vec<GroundTruthEntry>, EG>,
    ) -> Arc<AppState>
    where
        EM: Display,
        ES: Display,
        EG: Display,
    {
        let context = ServingContext::assemble(
            model,
            sensors,
            ground_truth,
            InferenceConfig::default(),
            LabelPolicy::default(),
        );
        Arc::new(AppState::with_context(context))
    }

    pub fn ready_state(raw: f64) -> Arc<AppState> {
        state_with::<String, String, String>(
            Ok(model(raw)),
            Ok(table()),
            Ok(vec![
                GroundTruthEntry { engine_id: 1, actual_rul: 90.0 },
                GroundTruthEntry { engine_id: 2, actual_rul: 50.0 },
            ]),
        )
    }

    pub fn app(state: Arc<AppState>) -> Router {
        let settings = ServerSettings {
            rate_limit: RateLimitConfig {
                enabled: false,
                ..Default::default()
            },
            ..Default::default()
        };
        create_router(state, &settings)
    }

    pub async fn get_json<T: DeserializeOwned>(app: Router, uri: &str) -> (StatusCode, T) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}
