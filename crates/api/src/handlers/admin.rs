//! Admin moderation handlers: agency license verification.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use filature_core::error::CoreError;
use filature_core::status::LicenseStatus;
use filature_core::types::DbId;
use filature_db::models::agency::LicenseDecision;
use filature_db::repositories::AgencyRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Pagination for the verification queue.
#[derive(Debug, Default, Deserialize)]
pub struct PendingQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Maximum page size for the verification queue.
const MAX_LIMIT: i64 = 100;

/// GET /api/v1/admin/agencies/pending
///
/// Agencies awaiting license verification, oldest first. Admin only.
pub async fn list_pending_agencies(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PendingQuery>,
) -> AppResult<impl IntoResponse> {
    auth.require_admin()?;

    let limit = params.limit.unwrap_or(50).min(MAX_LIMIT);
    let offset = params.offset.unwrap_or(0);
    let agencies = AgencyRepo::list_pending_verification(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: agencies }))
}

/// POST /api/v1/admin/agencies/{id}/license
///
/// Record a license decision for an agency. Admin only. Rejections
/// require a note explaining the decision.
pub async fn decide_license(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(agency_id): Path<DbId>,
    Json(input): Json<LicenseDecision>,
) -> AppResult<impl IntoResponse> {
    auth.require_admin()?;

    let status = match input.decision.as_str() {
        "verified" => LicenseStatus::Verified,
        "rejected" => LicenseStatus::Rejected,
        other => {
            return Err(AppError::BadRequest(format!(
                "Decision must be 'verified' or 'rejected', got '{other}'"
            )))
        }
    };

    if status == LicenseStatus::Rejected && input.note.as_deref().unwrap_or("").is_empty() {
        return Err(AppError::BadRequest(
            "A note is required when rejecting a license".into(),
        ));
    }

    let agency =
        AgencyRepo::set_license_status(&state.pool, agency_id, status, input.note.as_deref())
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Agency",
                id: agency_id,
            }))?;

    tracing::info!(
        agency_id,
        decision = %input.decision,
        admin_user_id = auth.user_id,
        "Agency license decision recorded"
    );

    Ok(Json(DataResponse { data: agency }))
}
