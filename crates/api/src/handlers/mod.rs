//! HTTP handlers, grouped by resource.
//!
//! Ownership checks live here: the workflow engine assumes its callers
//! are already authorized, so every mutating handler resolves the acting
//! profile and verifies it owns the target before invoking the engine.

pub mod admin;
pub mod agencies;
pub mod auth;
pub mod candidatures;
pub mod investigators;
pub mod mandates;
pub mod notifications;

use filature_core::error::CoreError;
use filature_core::status::LicenseStatus;
use filature_core::types::DbId;
use filature_db::models::agency::Agency;
use filature_db::models::investigator::Investigator;
use filature_db::models::mandate::Mandate;
use filature_db::repositories::{AgencyRepo, InvestigatorRepo, MandateRepo};

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Load the agency profile owned by the authenticated user.
pub(crate) async fn require_agency(
    state: &AppState,
    auth: &AuthUser,
) -> Result<Agency, AppError> {
    AgencyRepo::find_by_user_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Forbidden("Agency profile required".into()))
        })
}

/// Load the agency profile and require a verified license.
pub(crate) async fn require_verified_agency(
    state: &AppState,
    auth: &AuthUser,
) -> Result<Agency, AppError> {
    let agency = require_agency(state, auth).await?;
    if agency.license_status_id != LicenseStatus::Verified.id() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Agency license must be verified before this action".into(),
        )));
    }
    Ok(agency)
}

/// Load the investigator profile owned by the authenticated user.
pub(crate) async fn require_investigator(
    state: &AppState,
    auth: &AuthUser,
) -> Result<Investigator, AppError> {
    InvestigatorRepo::find_by_user_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Forbidden(
                "Investigator profile required".into(),
            ))
        })
}

/// Load a mandate and verify the authenticated user's agency owns it.
pub(crate) async fn require_mandate_owner(
    state: &AppState,
    auth: &AuthUser,
    mandate_id: DbId,
) -> Result<(Agency, Mandate), AppError> {
    let agency = require_agency(state, auth).await?;
    let mandate = MandateRepo::find_by_id(&state.pool, mandate_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Mandate",
            id: mandate_id,
        }))?;
    if mandate.agency_id != agency.id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Mandate belongs to another agency".into(),
        )));
    }
    Ok((agency, mandate))
}
