//! Route definitions for the `/admin` moderation surface.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. All endpoints require the admin role.
///
/// ```text
/// GET    /agencies/pending          -> list_pending_agencies
/// POST   /agencies/{id}/license     -> decide_license
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/agencies/pending", get(admin::list_pending_agencies))
        .route("/agencies/{id}/license", post(admin::decide_license))
}
