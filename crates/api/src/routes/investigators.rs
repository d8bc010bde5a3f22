//! Route definitions for the `/investigators` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::investigators;
use crate::state::AppState;

/// Routes mounted at `/investigators`.
///
/// ```text
/// GET    /me                                -> get_me
/// PUT    /me                                -> update_me
/// GET    /me/unavailable-dates              -> list_unavailable_dates
/// POST   /me/unavailable-dates              -> add_unavailable_date
/// DELETE /me/unavailable-dates/{date}       -> remove_unavailable_date
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/me",
            get(investigators::get_me).put(investigators::update_me),
        )
        .route(
            "/me/unavailable-dates",
            get(investigators::list_unavailable_dates)
                .post(investigators::add_unavailable_date),
        )
        .route(
            "/me/unavailable-dates/{date}",
            delete(investigators::remove_unavailable_date),
        )
}
