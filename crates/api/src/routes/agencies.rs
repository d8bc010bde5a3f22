//! Route definitions for the `/agencies` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::agencies;
use crate::state::AppState;

/// Routes mounted at `/agencies`.
///
/// ```text
/// GET    /me      -> get_me
/// PUT    /me      -> update_me
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(agencies::get_me).put(agencies::update_me))
}
