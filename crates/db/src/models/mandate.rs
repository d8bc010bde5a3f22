//! Mandate entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use filature_core::geo;
use filature_core::types::{DbId, Timestamp};

/// A row from the `mandates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Mandate {
    pub id: DbId,
    pub agency_id: DbId,
    pub title: String,
    pub mandate_type: String,
    pub description: String,
    pub city: String,
    pub region: String,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub date_required: Option<Timestamp>,
    pub duration_days: Option<i32>,
    pub priority: String,
    pub budget_cad_cents: Option<i64>,
    pub assignment_type: String,
    pub status_id: i16,
    pub assigned_to: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for posting a new mandate.
///
/// Field-shape checks live here via `validator`; the date lead-time rule
/// and the direct-assignment rules are enforced by the workflow engine.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMandate {
    #[validate(length(min = 3, max = 200))]
    pub title: String,
    #[validate(length(min = 2, max = 100))]
    pub mandate_type: String,
    #[validate(length(min = 10, max = 5000))]
    pub description: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 100))]
    pub region: String,
    #[validate(custom(function = validate_postal_code))]
    pub postal_code: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    pub date_required: Timestamp,
    #[validate(range(min = 1, max = 365))]
    pub duration_days: Option<i32>,
    /// `normal` (default), `high`, or `urgent`.
    pub priority: Option<String>,
    #[validate(range(min = 0))]
    pub budget_cad_cents: Option<i64>,
    /// `public` (default) or `direct`.
    pub assignment_type: Option<String>,
    /// Required when `assignment_type` is `direct`.
    pub direct_investigator_id: Option<DbId>,
}

fn validate_postal_code(code: &str) -> Result<(), ValidationError> {
    if geo::is_valid_postal_code(code) {
        Ok(())
    } else {
        Err(ValidationError::new("postal_code"))
    }
}

/// Query parameters for mandate listing.
#[derive(Debug, Default, Deserialize)]
pub struct MandateListQuery {
    /// Canonical status name filter (`open`, `in-progress`, ...).
    pub status: Option<String>,
    pub region: Option<String>,
    pub agency_id: Option<DbId>,
    pub assigned_to: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// DTO for requesting a status transition.
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    /// Canonical target status name.
    pub status: String,
}

/// DTO for a direct assignment request.
#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub investigator_id: DbId,
}
