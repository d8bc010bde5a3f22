//! Route definitions for the `/candidatures` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::candidatures;
use crate::state::AppState;

/// Routes mounted at `/candidatures`.
///
/// ```text
/// GET    /mine             -> list_mine
/// POST   /{id}/accept      -> accept
/// POST   /{id}/reject      -> reject
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/mine", get(candidatures::list_mine))
        .route("/{id}/accept", post(candidatures::accept))
        .route("/{id}/reject", post(candidatures::reject))
}
