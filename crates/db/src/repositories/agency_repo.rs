//! Repository for the `agencies` table.

use sqlx::PgPool;

use filature_core::status::LicenseStatus;
use filature_core::types::DbId;

use crate::models::agency::{Agency, CreateAgency, UpdateAgency};

/// Column list for `agencies` queries.
const COLUMNS: &str = "\
    id, user_id, name, permit_number, license_status_id, license_note, \
    phone, city, region, created_at, updated_at";

/// Provides CRUD operations for agencies.
pub struct AgencyRepo;

impl AgencyRepo {
    /// Insert a new agency profile. License status starts as `pending`.
    pub async fn create(pool: &PgPool, input: &CreateAgency) -> Result<Agency, sqlx::Error> {
        let query = format!(
            "INSERT INTO agencies (user_id, name, permit_number, phone, city, region) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Agency>(&query)
            .bind(input.user_id)
            .bind(&input.name)
            .bind(&input.permit_number)
            .bind(&input.phone)
            .bind(&input.city)
            .bind(&input.region)
            .fetch_one(pool)
            .await
    }

    /// Find an agency by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Agency>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM agencies WHERE id = $1");
        sqlx::query_as::<_, Agency>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the agency owned by a user.
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Agency>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM agencies WHERE user_id = $1");
        sqlx::query_as::<_, Agency>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Patch an agency's own profile fields. Returns the updated row, or
    /// `None` when the agency does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAgency,
    ) -> Result<Option<Agency>, sqlx::Error> {
        let query = format!(
            "UPDATE agencies SET \
                 name = COALESCE($2, name), \
                 phone = COALESCE($3, phone), \
                 city = COALESCE($4, city), \
                 region = COALESCE($5, region), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Agency>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(&input.city)
            .bind(&input.region)
            .fetch_optional(pool)
            .await
    }

    /// List agencies awaiting license verification, oldest first.
    pub async fn list_pending_verification(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Agency>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM agencies \
             WHERE license_status_id = $1 \
             ORDER BY created_at ASC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Agency>(&query)
            .bind(LicenseStatus::Pending.id())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Record an admin license decision. Returns the updated row, or
    /// `None` when the agency does not exist.
    pub async fn set_license_status(
        pool: &PgPool,
        id: DbId,
        status: LicenseStatus,
        note: Option<&str>,
    ) -> Result<Option<Agency>, sqlx::Error> {
        let query = format!(
            "UPDATE agencies SET \
                 license_status_id = $2, \
                 license_note = $3, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Agency>(&query)
            .bind(id)
            .bind(status.id())
            .bind(note)
            .fetch_optional(pool)
            .await
    }
}
