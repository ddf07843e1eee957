//! Risk register routes: assessment submission, listing, deletion, and the
//! dashboard projections (stats, heatmap, CSV export).

use std::collections::BTreeMap;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::errors::{ApiResponse, AppError};
use crate::models::risk::{RiskInput, RiskView};
use crate::services::query::RiskQuery;
use crate::services::{assessment, export, heatmap, query, stats};
use crate::AppState;

/// Service banner returned by the API root.
#[derive(Debug, Serialize)]
pub struct ApiInfo {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

/// GET /: API info.
pub async fn root() -> Json<ApiResponse<ApiInfo>> {
    ApiResponse::success(ApiInfo {
        message: "GRC Risk Assessment API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: BTreeMap::from([
            ("POST /assess-risk", "Submit a new risk assessment"),
            ("GET /risks", "List risks (?level=&search=&sort=&dir=)"),
            ("DELETE /risks/{id}", "Delete a risk"),
            ("GET /risks/stats", "Summary statistics"),
            ("GET /risks/heatmap", "5x5 likelihood x impact matrix"),
            ("GET /risks/export", "CSV export"),
        ]),
    })
}

/// POST /assess-risk: validate, score, and store a new assessment.
pub async fn assess(
    State(state): State<AppState>,
    body: Result<Json<RiskInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<RiskView>>), AppError> {
    let Json(body) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    let new_assessment = assessment::from_input(&body)?;
    let risk = assessment::create(&state.db, new_assessment).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(RiskView::from(risk))))
}

/// GET /risks: filtered and sorted register.
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<RiskQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<RiskView>>>, AppError> {
    let Query(params) = params.map_err(|e| AppError::Validation(e.body_text()))?;
    let snapshot = assessment::list_all(&state.db).await?;
    let views = query::query(&snapshot, &params)
        .into_iter()
        .map(RiskView::from)
        .collect();
    Ok(ApiResponse::success(views))
}

/// GET /risks/{id}: a single assessment.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<RiskView>>, AppError> {
    let risk = assessment::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(RiskView::from(risk)))
}

/// Confirmation body for deletions.
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub message: String,
}

/// DELETE /risks/{id}: remove an assessment.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Deleted>>, AppError> {
    assessment::delete(&state.db, id).await?;
    Ok(ApiResponse::success(Deleted {
        message: format!("Risk {id} deleted successfully"),
    }))
}

/// GET /risks/stats: summary statistics.
pub async fn get_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<stats::Stats>>, AppError> {
    let snapshot = assessment::list_all(&state.db).await?;
    Ok(ApiResponse::success(stats::aggregate(&snapshot)))
}

/// GET /risks/heatmap: likelihood x impact matrix.
pub async fn get_heatmap(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<heatmap::HeatmapView>>, AppError> {
    let snapshot = assessment::list_all(&state.db).await?;
    Ok(ApiResponse::success(heatmap::bin(&snapshot).summary()))
}

/// GET /risks/export: CSV download honoring the same filters as the list.
pub async fn export_csv(
    State(state): State<AppState>,
    params: Result<Query<RiskQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params.map_err(|e| AppError::Validation(e.body_text()))?;
    let snapshot = assessment::list_all(&state.db).await?;
    let rows = query::query(&snapshot, &params);
    let body = export::to_csv(&rows)?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export::file_name(chrono::Utc::now().date_naive())
    );
    tracing::debug!(rows = rows.len(), "Exporting risk register");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
