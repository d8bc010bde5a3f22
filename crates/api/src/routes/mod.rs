//! Route tree assembly.

pub mod admin;
pub mod agencies;
pub mod auth;
pub mod candidatures;
pub mod health;
pub mod investigators;
pub mod mandates;
pub mod notifications;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
///
/// /mandates                                        list, create
/// /mandates/{id}                                   get
/// /mandates/{id}/transitions                       legal next statuses
/// /mandates/{id}/status                            transition (POST)
/// /mandates/{id}/assign                            direct assignment (POST)
/// /mandates/{id}/unassign                          unassign (POST)
/// /mandates/{id}/candidatures                      list (owner), apply (POST)
/// /mandates/{id}/rating                            get, rate (POST)
///
/// /candidatures/mine                               investigator's own
/// /candidatures/{id}/accept                        accept (POST)
/// /candidatures/{id}/reject                        reject (POST)
///
/// /notifications                                   list
/// /notifications/unread-count                      unread counter
/// /notifications/read-all                          mark all read (POST)
/// /notifications/{id}/read                         mark read (POST)
/// /notifications/{id}                              delete (DELETE)
///
/// /investigators/me                                get, update (PUT)
/// /investigators/me/unavailable-dates              list, add (POST)
/// /investigators/me/unavailable-dates/{date}       remove (DELETE)
///
/// /agencies/me                                     get, update (PUT)
///
/// /admin/agencies/pending                          verification queue
/// /admin/agencies/{id}/license                     license decision (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/mandates", mandates::router())
        .nest("/candidatures", candidatures::router())
        .nest("/notifications", notifications::router())
        .nest("/investigators", investigators::router())
        .nest("/agencies", agencies::router())
        .nest("/admin", admin::router())
}
