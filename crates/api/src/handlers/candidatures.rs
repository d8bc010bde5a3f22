//! Handlers for candidatures: applying, listing, accepting, rejecting.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use filature_core::error::CoreError;
use filature_core::types::DbId;
use filature_db::models::candidature::ApplyRequest;
use filature_db::repositories::CandidatureRepo;
use filature_workflow::WorkflowService;

use crate::error::{AppError, AppResult};
use crate::handlers::{require_investigator, require_mandate_owner};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/mandates/{id}/candidatures
///
/// File a candidature for an open public mandate. Investigators only.
pub async fn apply(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(mandate_id): Path<DbId>,
    Json(input): Json<ApplyRequest>,
) -> AppResult<impl IntoResponse> {
    let investigator = require_investigator(&state, &auth).await?;

    let candidature = WorkflowService::apply_to_mandate(
        &state.pool,
        mandate_id,
        investigator.id,
        input.message,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: candidature })))
}

/// GET /api/v1/mandates/{id}/candidatures
///
/// All candidatures for a mandate. Owner only.
pub async fn list_for_mandate(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(mandate_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    require_mandate_owner(&state, &auth, mandate_id).await?;

    let candidatures = CandidatureRepo::list_for_mandate(&state.pool, mandate_id).await?;
    Ok(Json(DataResponse { data: candidatures }))
}

/// GET /api/v1/candidatures/mine
///
/// The authenticated investigator's own candidatures.
pub async fn list_mine(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let investigator = require_investigator(&state, &auth).await?;

    let candidatures =
        CandidatureRepo::list_for_investigator(&state.pool, investigator.id).await?;
    Ok(Json(DataResponse { data: candidatures }))
}

/// POST /api/v1/candidatures/{id}/accept
///
/// Accept a candidature: assigns the mandate and notifies everyone
/// involved. Owner of the mandate only.
pub async fn accept(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(candidature_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_candidature_owner(&state, &auth, candidature_id).await?;

    let candidature =
        WorkflowService::accept_candidature(&state.pool, &state.event_bus, candidature_id)
            .await?;

    Ok(Json(DataResponse { data: candidature }))
}

/// POST /api/v1/candidatures/{id}/reject
///
/// Reject a candidature. Owner of the mandate only.
pub async fn reject(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(candidature_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_candidature_owner(&state, &auth, candidature_id).await?;

    let candidature =
        WorkflowService::reject_candidature(&state.pool, &state.event_bus, candidature_id)
            .await?;

    Ok(Json(DataResponse { data: candidature }))
}

/// Verify the authenticated user's agency owns the mandate behind a
/// candidature.
async fn ensure_candidature_owner(
    state: &AppState,
    auth: &AuthUser,
    candidature_id: DbId,
) -> Result<(), AppError> {
    let candidature = CandidatureRepo::find_by_id(&state.pool, candidature_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Candidature",
            id: candidature_id,
        }))?;
    require_mandate_owner(state, auth, candidature.mandate_id).await?;
    Ok(())
}
