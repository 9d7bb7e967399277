//! Dashboard routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use axum_extra::extract::Query;
use lavra_core::dashboard::{
    Predicate, QueryShape, Renderer, category_bars, detail_table, ranking_table, year_series,
};
use lavra_core::dimension::FilterSelection;
use lavra_shared::AppError;
use serde::Deserialize;
use tracing::info;

use crate::AppState;
use crate::error::ApiError;
use crate::render::{DashboardResponse, JsonRenderer, PanelView};

/// Creates the dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/panels/{panel}", get(get_panel))
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Filter selections as repeated query keys, e.g.
/// `?region=MG&region=SP&class=Metálicos&year=2020`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SelectionQuery {
    /// Region codes.
    pub region: Vec<String>,
    /// Class names.
    pub class: Vec<String>,
    /// Substance names.
    pub substance: Vec<String>,
    /// Years.
    pub year: Vec<i32>,
}

impl From<SelectionQuery> for FilterSelection {
    fn from(query: SelectionQuery) -> Self {
        Self {
            regions: query.region.into_iter().collect(),
            classes: query.class.into_iter().collect(),
            substances: query.substance.into_iter().collect(),
            years: query.year.into_iter().collect(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /dashboard
///
/// Runs all five panel queries for the selection.
async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<SelectionQuery>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let selection = FilterSelection::from(query);
    let snapshot = state.dashboard.refresh(&selection).await?;
    Ok(Json(DashboardResponse::from_snapshot(
        &snapshot,
        &state.options,
    )))
}

/// GET /dashboard/panels/{panel}
///
/// Runs a single panel query.
async fn get_panel(
    State(state): State<AppState>,
    Path(panel): Path<String>,
    Query(query): Query<SelectionQuery>,
) -> Result<Json<PanelView>, ApiError> {
    let shape = QueryShape::from_id(&panel)
        .ok_or_else(|| AppError::NotFound(format!("Unknown panel '{panel}'")))?;
    let predicate = Predicate::build(&FilterSelection::from(query));
    info!(panel = %shape, predicate = %predicate, "rendering panel");

    let mut renderer = JsonRenderer::new();
    let dashboard = &state.dashboard;
    match shape {
        QueryShape::DetailTable => {
            let rows = dashboard.detail(&predicate).await?;
            renderer.table(shape, detail_table(&rows));
        }
        QueryShape::RomByYear => {
            let rows = dashboard.rom_by_year(&predicate).await?;
            renderer.line_chart(shape, year_series(&rows));
        }
        QueryShape::ValueByClass => {
            let rows = dashboard.value_by_class(&predicate).await?;
            renderer.bar_chart(shape, category_bars(&rows));
        }
        QueryShape::TopSubstancesByRom => {
            let rows = dashboard.top_substances_by_rom(&predicate).await?;
            renderer.table(shape, ranking_table(shape, &rows));
        }
        QueryShape::TopRegionsByValue => {
            let rows = dashboard.top_regions_by_value(&predicate).await?;
            renderer.table(shape, ranking_table(shape, &rows));
        }
    }

    renderer
        .into_panels()
        .pop()
        .map(Json)
        .ok_or_else(|| AppError::Internal(format!("Panel '{shape}' produced no output")).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_json, test_state};
    use axum::http::StatusCode;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use sea_orm::ConnectionTrait;

    fn decimal(value: &serde_json::Value) -> Decimal {
        value.as_str().unwrap().parse().unwrap()
    }

    #[tokio::test]
    async fn test_dashboard_for_region_and_year() {
        let app = routes().with_state(test_state().await);

        let (status, json) = get_json(app, "/dashboard?region=MG&year=2020").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["selection"]["regions"][0], "MG");
        assert_eq!(json["predicate"], r#"region IN ["MG"] AND year IN [2020]"#);

        let panels = json["panels"].as_array().unwrap();
        let kinds: Vec<(&str, &str)> = panels
            .iter()
            .map(|p| (p["panel"].as_str().unwrap(), p["kind"].as_str().unwrap()))
            .collect();
        assert_eq!(
            kinds,
            [
                ("detail", "table"),
                ("rom-by-year", "line_chart"),
                ("value-by-class", "bar_chart"),
                ("top-substances", "table"),
                ("top-regions", "table"),
            ]
        );

        // Ferro 150 + Ouro 2
        assert_eq!(panels[0]["rows"].as_array().unwrap().len(), 2);
        assert_eq!(panels[1]["points"][0]["x"], 2020);
        assert_eq!(decimal(&panels[1]["points"][0]["y"]), dec!(152));
        assert_eq!(panels[4]["rows"][0][0], "MG");
    }

    #[tokio::test]
    async fn test_repeated_keys_select_multiple_values() {
        let app = routes().with_state(test_state().await);

        let (status, json) = get_json(app, "/dashboard?region=SP&region=MG&class=Met%C3%A1licos").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["selection"]["regions"], serde_json::json!(["MG", "SP"]));
        let regions = json["panels"][4]["rows"].as_array().unwrap();
        // MG: 300.5 + 450 + 600, SP: 290 (Calcário is not Metálicos)
        assert_eq!(regions[0][0], "MG");
        assert_eq!(decimal(&regions[0][1]), dec!(1350.5));
        assert_eq!(regions[1][0], "SP");
        assert_eq!(decimal(&regions[1][1]), dec!(290));
    }

    #[tokio::test]
    async fn test_unknown_values_are_reported_not_rejected() {
        let app = routes().with_state(test_state().await);

        let (status, json) = get_json(app, "/dashboard?region=ZZ").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["unknown_values"][0]["dimension"], "region");
        assert_eq!(json["unknown_values"][0]["value"], "ZZ");
        assert!(json["panels"][0]["rows"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_single_panel() {
        let app = routes().with_state(test_state().await);

        let (status, json) = get_json(app, "/dashboard/panels/value-by-class?year=2019").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["panel"], "value-by-class");
        assert_eq!(json["kind"], "bar_chart");
        assert_eq!(json["bars"][0]["category"], "Metálicos");
        assert_eq!(decimal(&json["bars"][0]["value"]), dec!(590.5));
        assert_eq!(json["bars"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_panel_is_not_found() {
        let app = routes().with_state(test_state().await);

        let (status, json) = get_json(app, "/dashboard/panels/pie-chart").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_invalid_year_is_rejected() {
        let app = routes().with_state(test_state().await);

        let response = tower::ServiceExt::oneshot(
            app,
            axum::http::Request::builder()
                .uri("/dashboard?year=twenty")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_failed_panel_does_not_fail_dashboard() {
        let state = test_state().await;
        state
            .db
            .execute_unprepared("ALTER TABLE UNIDADE_CONTIDO RENAME TO UNIDADE_ARQUIVADA;")
            .await
            .unwrap();
        let app = routes().with_state(state);

        let (status, json) = get_json(app.clone(), "/dashboard").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["panels"][0]["kind"], "failure");
        assert_eq!(json["panels"][1]["kind"], "line_chart");

        let (status, json) = get_json(app, "/dashboard/panels/detail").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "QUERY_EXECUTION_ERROR");
    }

    #[tokio::test]
    async fn test_unreachable_dataset_is_service_unavailable() {
        let state = test_state().await;
        (*state.db).clone().close().await.unwrap();
        let app = routes().with_state(state);

        let (status, json) = get_json(app, "/dashboard").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["error"], "DATA_SOURCE_UNAVAILABLE");
    }
}
