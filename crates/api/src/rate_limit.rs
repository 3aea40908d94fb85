//! Per-IP rate limiting using tower_governor (GCRA).

use governor::middleware::StateInformationMiddleware;
use serde::{Deserialize, Serialize};
use tracing::debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;

/// Governor config keyed by peer IP, with X-RateLimit-* headers
pub type DefaultGovernorConfig =
    tower_governor::governor::GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>;

/// Rate limiting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub enabled: bool,
    /// Seconds per replenished request
    pub per_second: u64,
    /// Requests that can be made immediately
    pub burst_size: u32,
    /// Seconds between sweeps of idle client entries
    pub cleanup_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_second: 1,
            burst_size: 20,
            cleanup_interval_secs: 60,
        }
    }
}

/// Build the governor config for [`tower_governor::GovernorLayer`].
///
/// Returns `None` when limiting is disabled or the quota is zero. Peer IPs
/// are only visible when the service is built with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn create_governor_config(config: &RateLimitConfig) -> Option<Arc<DefaultGovernorConfig>> {
    if !config.enabled {
        return None;
    }
    GovernorConfigBuilder::default()
        .per_second(config.per_second)
        .burst_size(config.burst_size)
        .use_headers()
        .finish()
        .map(Arc::new)
}

/// Periodically drop per-IP state that has fully replenished.
///
/// The task holds only a weak reference and exits once the limiter is dropped.
pub fn spawn_limiter_cleanup(config: &DefaultGovernorConfig, every: Duration) -> JoinHandle<()> {
    let limiter = Arc::downgrade(config.limiter());
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let Some(limiter) = limiter.upgrade() else {
                break;
            };
            debug!("Rate limiter tracking {} clients", limiter.len());
            limiter.retain_recent();
        }
    })
}
