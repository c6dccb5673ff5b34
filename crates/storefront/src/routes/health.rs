//! Health check handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::state::AppState;

/// Liveness check.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness check: the catalog must answer.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    match state.catalog().list_categories().await {
        Ok(_) => (StatusCode::OK, "ready"),
        Err(e) => {
            tracing::warn!("Readiness check failed: {e}");
            (StatusCode::SERVICE_UNAVAILABLE, "catalog unavailable")
        }
    }
}
