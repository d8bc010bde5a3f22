//! Health check endpoint, mounted at the root (not under `/api/v1`).

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::error::AppResult;
use crate::state::AppState;

/// Routes mounted at `/`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// GET /health
///
/// Verifies database connectivity.
async fn health(State(state): State<AppState>) -> AppResult<Json<serde_json::Value>> {
    filature_db::health_check(&state.pool).await?;
    Ok(Json(json!({ "status": "ok" })))
}
