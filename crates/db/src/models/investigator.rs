//! Investigator entity models and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use filature_core::types::{DbId, Timestamp};

/// A row from the `investigators` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Investigator {
    pub id: DbId,
    pub user_id: DbId,
    pub display_name: String,
    pub availability_status_id: i16,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub specialities: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload for a new investigator profile.
#[derive(Debug, Clone)]
pub struct CreateInvestigator {
    pub user_id: DbId,
    pub display_name: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub specialities: Option<serde_json::Value>,
}

/// DTO for updating an investigator's own profile.
#[derive(Debug, Deserialize)]
pub struct UpdateInvestigator {
    pub display_name: Option<String>,
    /// Canonical availability status name (`available|busy|unavailable`).
    pub availability_status: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub specialities: Option<serde_json::Value>,
}

/// A row from the `investigator_unavailable_dates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UnavailableDate {
    pub id: DbId,
    pub investigator_id: DbId,
    pub unavailable_on: NaiveDate,
    pub created_at: Timestamp,
}

/// DTO for blocking out a calendar day.
#[derive(Debug, Deserialize)]
pub struct AddUnavailableDate {
    pub unavailable_on: NaiveDate,
}
