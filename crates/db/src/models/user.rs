//! User entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use filature_core::types::{DbId, Timestamp};

/// Role of an agency owner. Agencies post mandates.
pub const ROLE_AGENCY: &str = "agency";

/// Role of an investigator. Investigators apply to and work mandates.
pub const ROLE_INVESTIGATOR: &str = "investigator";

/// Role of a platform moderator (license verification).
pub const ROLE_ADMIN: &str = "admin";

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub full_name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload for a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub full_name: String,
}

/// A row from the `refresh_tokens` table.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshToken {
    pub id: DbId,
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for the refresh/logout endpoints.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}
