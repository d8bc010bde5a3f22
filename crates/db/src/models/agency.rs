//! Agency entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use filature_core::types::{DbId, Timestamp};

/// A row from the `agencies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Agency {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub permit_number: String,
    pub license_status_id: i16,
    pub license_note: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload for a new agency profile.
#[derive(Debug, Clone)]
pub struct CreateAgency {
    pub user_id: DbId,
    pub name: String,
    pub permit_number: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
}

/// DTO for updating an agency's own profile.
#[derive(Debug, Deserialize)]
pub struct UpdateAgency {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
}

/// DTO for an admin license decision.
#[derive(Debug, Deserialize)]
pub struct LicenseDecision {
    /// `"verified"` or `"rejected"`.
    pub decision: String,
    /// Required when rejecting.
    pub note: Option<String>,
}
