//! Candidature (mandate interest) entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use filature_core::types::{DbId, Timestamp};

/// A row from the `candidatures` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Candidature {
    pub id: DbId,
    pub mandate_id: DbId,
    pub investigator_id: DbId,
    pub status_id: i16,
    pub message: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for an investigator applying to a mandate.
#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub message: Option<String>,
}

/// Insert payload for a new candidature.
#[derive(Debug, Clone)]
pub struct CreateCandidature {
    pub mandate_id: DbId,
    pub investigator_id: DbId,
    pub message: Option<String>,
}
