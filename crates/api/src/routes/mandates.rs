//! Route definitions for the `/mandates` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{candidatures, mandates};
use crate::state::AppState;

/// Routes mounted at `/mandates`.
///
/// ```text
/// GET    /                      -> list_mandates
/// POST   /                      -> create_mandate
/// GET    /{id}                  -> get_mandate
/// GET    /{id}/transitions      -> list_transitions
/// POST   /{id}/status           -> transition_status
/// POST   /{id}/assign           -> assign_investigator
/// POST   /{id}/unassign         -> unassign_investigator
/// GET    /{id}/candidatures     -> list_for_mandate
/// POST   /{id}/candidatures     -> apply
/// GET    /{id}/rating           -> get_rating
/// POST   /{id}/rating           -> rate_mandate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(mandates::list_mandates).post(mandates::create_mandate),
        )
        .route("/{id}", get(mandates::get_mandate))
        .route("/{id}/transitions", get(mandates::list_transitions))
        .route("/{id}/status", post(mandates::transition_status))
        .route("/{id}/assign", post(mandates::assign_investigator))
        .route("/{id}/unassign", post(mandates::unassign_investigator))
        .route(
            "/{id}/candidatures",
            get(candidatures::list_for_mandate).post(candidatures::apply),
        )
        .route(
            "/{id}/rating",
            get(mandates::get_rating).post(mandates::rate_mandate),
        )
}
