//! Route definitions for the risk register API.

pub mod health;
pub mod risks;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    let risk_routes = Router::new()
        .route("/assess-risk", post(risks::assess))
        .route("/risks", get(risks::list))
        .route("/risks/stats", get(risks::get_stats))
        .route("/risks/heatmap", get(risks::get_heatmap))
        .route("/risks/export", get(risks::export_csv))
        .route(
            "/risks/{id}",
            get(risks::get_by_id).delete(risks::delete),
        );

    Router::new()
        .route("/", get(risks::root))
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .merge(risk_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS policy: any origin for `*`, otherwise the configured frontend only.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allows_any_origin() {
        return cors.allow_origin(Any);
    }

    match config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(e) => {
            tracing::warn!(
                error = %e,
                frontend_url = %config.frontend_url,
                "Invalid FRONTEND_URL, allowing any origin"
            );
            cors.allow_origin(Any)
        }
    }
}
