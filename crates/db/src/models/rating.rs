//! Mandate rating entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use filature_core::types::{DbId, Timestamp};

/// A row from the `mandate_ratings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MandateRating {
    pub id: DbId,
    pub mandate_id: DbId,
    pub agency_id: DbId,
    pub investigator_id: DbId,
    pub score: i16,
    pub comment: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for rating a completed mandate.
#[derive(Debug, Deserialize, Validate)]
pub struct RateRequest {
    #[validate(range(min = 1, max = 5))]
    pub score: i16,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}
