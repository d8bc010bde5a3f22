//! Handlers for the agency's own profile.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use filature_db::models::agency::UpdateAgency;
use filature_db::repositories::AgencyRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::require_agency;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/agencies/me
pub async fn get_me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let agency = require_agency(&state, &auth).await?;
    Ok(Json(DataResponse { data: agency }))
}

/// PUT /api/v1/agencies/me
pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateAgency>,
) -> AppResult<impl IntoResponse> {
    let agency = require_agency(&state, &auth).await?;
    let updated = AgencyRepo::update(&state.pool, agency.id, &input)
        .await?
        .ok_or_else(|| AppError::InternalError("profile vanished during update".into()))?;
    Ok(Json(DataResponse { data: updated }))
}
