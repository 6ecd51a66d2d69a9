//! Health check endpoint.

use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::get};
use serde_json::json;

use crate::AppState;

/// Liveness probe reporting the service name and build version.
async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

/// Creates the health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
