//! Handlers for the investigator's own profile, availability, and
//! blocked-out dates.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;

use filature_core::status::AvailabilityStatus;
use filature_db::models::investigator::{AddUnavailableDate, UpdateInvestigator};
use filature_db::repositories::InvestigatorRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::require_investigator;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/investigators/me
pub async fn get_me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let investigator = require_investigator(&state, &auth).await?;
    Ok(Json(DataResponse { data: investigator }))
}

/// PUT /api/v1/investigators/me
pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateInvestigator>,
) -> AppResult<impl IntoResponse> {
    let investigator = require_investigator(&state, &auth).await?;

    let availability_status_id = match &input.availability_status {
        Some(name) => Some(
            AvailabilityStatus::parse(name)
                .ok_or_else(|| {
                    AppError::BadRequest(format!("Unknown availability status '{name}'"))
                })?
                .id(),
        ),
        None => None,
    };

    let updated = InvestigatorRepo::update(
        &state.pool,
        investigator.id,
        input.display_name.as_deref(),
        availability_status_id,
        input.phone.as_deref(),
        input.city.as_deref(),
        input.region.as_deref(),
        input.specialities.as_ref(),
    )
    .await?
    .ok_or_else(|| AppError::InternalError("profile vanished during update".into()))?;

    Ok(Json(DataResponse { data: updated }))
}

/// GET /api/v1/investigators/me/unavailable-dates
pub async fn list_unavailable_dates(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let investigator = require_investigator(&state, &auth).await?;
    let dates = InvestigatorRepo::list_unavailable_dates(&state.pool, investigator.id).await?;
    Ok(Json(DataResponse { data: dates }))
}

/// POST /api/v1/investigators/me/unavailable-dates
pub async fn add_unavailable_date(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<AddUnavailableDate>,
) -> AppResult<impl IntoResponse> {
    let investigator = require_investigator(&state, &auth).await?;
    let date = InvestigatorRepo::add_unavailable_date(
        &state.pool,
        investigator.id,
        input.unavailable_on,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: date })))
}

/// DELETE /api/v1/investigators/me/unavailable-dates/{date}
pub async fn remove_unavailable_date(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> AppResult<impl IntoResponse> {
    let investigator = require_investigator(&state, &auth).await?;
    InvestigatorRepo::remove_unavailable_date(&state.pool, investigator.id, date).await?;
    Ok(StatusCode::NO_CONTENT)
}
