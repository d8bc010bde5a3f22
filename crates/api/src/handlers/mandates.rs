//! Handlers for the mandate lifecycle.
//!
//! Mutations all route through [`WorkflowService`]; these handlers only
//! resolve ownership and translate HTTP shapes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use validator::Validate;

use filature_core::error::CoreError;
use filature_core::status::MandateStatus;
use filature_core::types::DbId;
use filature_core::workflow;
use filature_db::models::mandate::{
    AssignRequest, CreateMandate, MandateListQuery, TransitionRequest,
};
use filature_db::models::rating::RateRequest;
use filature_db::repositories::{MandateRepo, RatingRepo};
use filature_workflow::WorkflowService;

use crate::error::{AppError, AppResult};
use crate::handlers::{require_mandate_owner, require_verified_agency};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/mandates
///
/// List mandates with optional status/region/agency filters.
pub async fn list_mandates(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<MandateListQuery>,
) -> AppResult<impl IntoResponse> {
    let status_id = match &params.status {
        Some(name) => Some(
            MandateStatus::parse(name)
                .ok_or_else(|| {
                    AppError::BadRequest(format!("Unknown mandate status '{name}'"))
                })?
                .id(),
        ),
        None => None,
    };

    let mandates = MandateRepo::list(&state.pool, status_id, &params).await?;
    Ok(Json(DataResponse { data: mandates }))
}

/// POST /api/v1/mandates
///
/// Post a new mandate. Requires a verified agency license.
pub async fn create_mandate(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateMandate>,
) -> AppResult<impl IntoResponse> {
    let agency = require_verified_agency(&state, &auth).await?;
    input.validate()?;

    let mandate =
        WorkflowService::create_mandate(&state.pool, &state.event_bus, agency.id, &input)
            .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: mandate })))
}

/// GET /api/v1/mandates/{id}
pub async fn get_mandate(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(mandate_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mandate = MandateRepo::find_by_id(&state.pool, mandate_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Mandate",
            id: mandate_id,
        }))?;
    Ok(Json(DataResponse { data: mandate }))
}

/// GET /api/v1/mandates/{id}/transitions
///
/// The status names this mandate can legally move to.
pub async fn list_transitions(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(mandate_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mandate = MandateRepo::find_by_id(&state.pool, mandate_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Mandate",
            id: mandate_id,
        }))?;

    let current = MandateStatus::from_id(mandate.status_id).ok_or_else(|| {
        AppError::InternalError(format!(
            "mandate {mandate_id} has unknown status id {}",
            mandate.status_id
        ))
    })?;

    let next: Vec<&'static str> = workflow::valid_next_states(current)
        .into_iter()
        .map(MandateStatus::as_str)
        .collect();

    Ok(Json(DataResponse {
        data: json!({
            "current": current.as_str(),
            "next": next,
        }),
    }))
}

/// POST /api/v1/mandates/{id}/status
///
/// Request a validated status transition. Owner only.
pub async fn transition_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(mandate_id): Path<DbId>,
    Json(input): Json<TransitionRequest>,
) -> AppResult<impl IntoResponse> {
    require_mandate_owner(&state, &auth, mandate_id).await?;

    let mandate = WorkflowService::transition_status(
        &state.pool,
        &state.event_bus,
        mandate_id,
        &input.status,
    )
    .await?;

    Ok(Json(DataResponse { data: mandate }))
}

/// POST /api/v1/mandates/{id}/assign
///
/// Directly assign an investigator. Owner only.
pub async fn assign_investigator(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(mandate_id): Path<DbId>,
    Json(input): Json<AssignRequest>,
) -> AppResult<impl IntoResponse> {
    require_mandate_owner(&state, &auth, mandate_id).await?;

    let mandate = WorkflowService::assign_investigator(
        &state.pool,
        &state.event_bus,
        mandate_id,
        input.investigator_id,
    )
    .await?;

    Ok(Json(DataResponse { data: mandate }))
}

/// POST /api/v1/mandates/{id}/unassign
///
/// Remove the assigned investigator and reopen the mandate. Owner only.
pub async fn unassign_investigator(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(mandate_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    require_mandate_owner(&state, &auth, mandate_id).await?;

    let mandate =
        WorkflowService::unassign_investigator(&state.pool, &state.event_bus, mandate_id)
            .await?;

    Ok(Json(DataResponse { data: mandate }))
}

/// POST /api/v1/mandates/{id}/rating
///
/// Rate a completed mandate. Owner only, at most once.
pub async fn rate_mandate(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(mandate_id): Path<DbId>,
    Json(input): Json<RateRequest>,
) -> AppResult<impl IntoResponse> {
    require_mandate_owner(&state, &auth, mandate_id).await?;
    input.validate()?;

    let rating = WorkflowService::rate_mandate(
        &state.pool,
        mandate_id,
        input.score,
        input.comment.as_deref(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: rating })))
}

/// GET /api/v1/mandates/{id}/rating
pub async fn get_rating(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(mandate_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let rating = RatingRepo::find_by_mandate(&state.pool, mandate_id).await?;
    Ok(Json(DataResponse { data: rating }))
}
