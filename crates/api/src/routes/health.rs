//! Health check endpoints.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Whether the dataset answered a ping.
    pub database: bool,
    /// Dashboard cache counters.
    pub cache: CacheResponse,
}

/// Cache counters.
#[derive(Serialize)]
pub struct CacheResponse {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that ran a query.
    pub misses: u64,
}

/// Health check handler.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state.db.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "dataset ping failed");
            false
        }
    };
    let stats = state.dashboard.cache_stats();

    Json(HealthResponse {
        status: if database { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database,
        cache: CacheResponse {
            hits: stats.hits,
            misses: stats.misses,
        },
    })
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
