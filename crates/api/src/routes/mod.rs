//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod dashboard;
pub mod filters;
pub mod health;
pub mod live;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(filters::routes())
        .merge(dashboard::routes())
        .merge(live::routes())
}
