//! Turbofan RUL API Server
//!
//! HTTP query surface over the immutable serving context. Startup data is
//! loaded on a blocking task after the listener is bound; until it lands,
//! queries answer `503 Service Unavailable`.

use axum::{routing::get, Router};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

mod error;
mod rate_limit;
mod routes;
mod settings;
mod startup;

pub use error::{ApiError, ErrorBody};
pub use rate_limit::{create_governor_config, spawn_limiter_cleanup, RateLimitConfig};
pub use routes::analyze::AnalysisResponse;
pub use routes::health::{ComponentHealth, ComponentStatus, HealthResponse, SystemMetrics};
pub use settings::{DataPaths, ServerSettings, CONFIG_PATH_VAR, DEFAULT_CONFIG_PATH};
pub use telemetry::{init_logging, LogSettings};
pub use startup::{load_context, spawn_loader};

use inference_engine::ServingContext;

/// Application state shared across handlers
pub struct AppState {
    /// Set exactly once when startup loading finishes
    context: OnceLock<ServingContext>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: Instant,
    /// Prometheus renderer, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// State with loading still pending
    pub fn new(metrics: Option<PrometheusHandle>) -> Self {
        Self {
            context: OnceLock::new(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
            metrics,
        }
    }

    /// State with an already assembled context
    pub fn with_context(context: ServingContext) -> Self {
        let state = Self::new(None);
        state.install(context);
        state
    }

    /// Publish the serving context; returns false if one was already set
    pub fn install(&self, context: ServingContext) -> bool {
        self.context.set(context).is_ok()
    }

    /// Serving context, once loading has finished
    pub fn context(&self) -> Option<&ServingContext> {
        self.context.get()
    }
}

/// Create the application router.
///
/// With rate limiting enabled this spawns the limiter cleanup task, so it must
/// run inside a Tokio runtime.
pub fn create_router(state: Arc<AppState>, settings: &ServerSettings) -> Router {
    let mut router = Router::new()
        .route("/analyze/:engine_id", get(routes::analyze::analyze_engine))
        .route("/api/v1/health", get(routes::health::health_handler))
        .route("/metrics", get(routes::metrics::metrics_handler))
        .with_state(state);

    if let Some(config) = create_governor_config(&settings.rate_limit) {
        info!(
            "Rate limiting enabled: burst {} per {}s",
            settings.rate_limit.burst_size, settings.rate_limit.per_second
        );
        spawn_limiter_cleanup(
            &config,
            Duration::from_secs(settings.rate_limit.cleanup_interval_secs.max(1)),
        );
        router = router.layer(GovernorLayer { config });
    }
    if settings.cors_permissive {
        router = router.layer(CorsLayer::permissive());
    }
    router.layer(TraceLayer::new_for_http())
}

/// Install the global Prometheus recorder
pub fn install_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Metrics recorder not installed: {}", e);
            None
        }
    }
}

/// Serve the router on an already bound listener
pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    settings: &ServerSettings,
) -> std::io::Result<()> {
    let app = create_router(state, settings);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
}

/// Run the server
pub async fn run_server(settings: ServerSettings) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState::new(install_metrics()));

    info!("Starting API server on {}", settings.bind_addr);
    let listener = TcpListener::bind(&settings.bind_addr).await?;

    spawn_loader(state.clone(), settings.clone());
    serve(listener, state, &settings).await?;

    Ok(())
}
