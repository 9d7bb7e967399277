//! Filter option routes.

use axum::{Json, Router, extract::State, routing::get};
use lavra_core::dimension::DimensionOptions;

use crate::AppState;

/// GET /filters
///
/// Returns the option lists loaded at startup.
async fn list_filters(State(state): State<AppState>) -> Json<DimensionOptions> {
    Json((*state.options).clone())
}

/// Creates the filter option routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/filters", get(list_filters))
}
