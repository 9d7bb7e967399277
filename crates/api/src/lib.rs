//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST routes for filter options and dashboard panels
//! - A WebSocket route that re-renders the dashboard on every filter change
//! - A JSON implementation of the dashboard renderer
//! - Error to response mapping

pub mod error;
pub mod render;
pub mod routes;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use axum::Router;
use lavra_core::dimension::DimensionOptions;
use lavra_db::DashboardService;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Cached dashboard queries.
    pub dashboard: Arc<DashboardService>,
    /// Filter options, loaded once at startup.
    pub options: Arc<DimensionOptions>,
}

impl AppState {
    /// Builds the state from an open connection and the loaded options.
    #[must_use]
    pub fn new(
        db: DatabaseConnection,
        options: DimensionOptions,
        cache_capacity: Option<u64>,
    ) -> Self {
        let dashboard = DashboardService::with_cache_capacity(db.clone(), cache_capacity);
        Self {
            db: Arc::new(db),
            dashboard: Arc::new(dashboard),
            options: Arc::new(options),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
