//! Repository for the `investigators` and `investigator_unavailable_dates`
//! tables.

use chrono::NaiveDate;
use sqlx::PgPool;

use filature_core::types::DbId;

use crate::models::investigator::{
    CreateInvestigator, Investigator, UnavailableDate,
};

/// Column list for `investigators` queries.
const COLUMNS: &str = "\
    id, user_id, display_name, availability_status_id, phone, city, region, \
    specialities, created_at, updated_at";

/// Column list for `investigator_unavailable_dates` queries.
const DATE_COLUMNS: &str = "id, investigator_id, unavailable_on, created_at";

/// Provides CRUD operations for investigators and their blocked-out dates.
pub struct InvestigatorRepo;

impl InvestigatorRepo {
    /// Insert a new investigator profile. Availability starts `available`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateInvestigator,
    ) -> Result<Investigator, sqlx::Error> {
        let query = format!(
            "INSERT INTO investigators (user_id, display_name, phone, city, region, specialities) \
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, '[]'::jsonb)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Investigator>(&query)
            .bind(input.user_id)
            .bind(&input.display_name)
            .bind(&input.phone)
            .bind(&input.city)
            .bind(&input.region)
            .bind(&input.specialities)
            .fetch_one(pool)
            .await
    }

    /// Find an investigator by id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Investigator>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM investigators WHERE id = $1");
        sqlx::query_as::<_, Investigator>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the investigator profile owned by a user.
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Investigator>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM investigators WHERE user_id = $1");
        sqlx::query_as::<_, Investigator>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Patch profile fields. `availability_status_id` is resolved by the
    /// caller from the canonical name. Returns the updated row, or `None`
    /// when the investigator does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        display_name: Option<&str>,
        availability_status_id: Option<i16>,
        phone: Option<&str>,
        city: Option<&str>,
        region: Option<&str>,
        specialities: Option<&serde_json::Value>,
    ) -> Result<Option<Investigator>, sqlx::Error> {
        let query = format!(
            "UPDATE investigators SET \
                 display_name = COALESCE($2, display_name), \
                 availability_status_id = COALESCE($3, availability_status_id), \
                 phone = COALESCE($4, phone), \
                 city = COALESCE($5, city), \
                 region = COALESCE($6, region), \
                 specialities = COALESCE($7, specialities), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Investigator>(&query)
            .bind(id)
            .bind(display_name)
            .bind(availability_status_id)
            .bind(phone)
            .bind(city)
            .bind(region)
            .bind(specialities)
            .fetch_optional(pool)
            .await
    }

    /// Block out a calendar day. Idempotent: re-adding an existing day
    /// returns the existing row.
    pub async fn add_unavailable_date(
        pool: &PgPool,
        investigator_id: DbId,
        day: NaiveDate,
    ) -> Result<UnavailableDate, sqlx::Error> {
        let query = format!(
            "INSERT INTO investigator_unavailable_dates (investigator_id, unavailable_on) \
             VALUES ($1, $2) \
             ON CONFLICT ON CONSTRAINT uq_unavailable_dates_investigator_day \
             DO UPDATE SET unavailable_on = EXCLUDED.unavailable_on \
             RETURNING {DATE_COLUMNS}"
        );
        sqlx::query_as::<_, UnavailableDate>(&query)
            .bind(investigator_id)
            .bind(day)
            .fetch_one(pool)
            .await
    }

    /// Unblock a calendar day. Returns `true` if a row was removed.
    pub async fn remove_unavailable_date(
        pool: &PgPool,
        investigator_id: DbId,
        day: NaiveDate,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM investigator_unavailable_dates \
             WHERE investigator_id = $1 AND unavailable_on = $2",
        )
        .bind(investigator_id)
        .bind(day)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All blocked-out days for an investigator, soonest first.
    pub async fn list_unavailable_dates(
        pool: &PgPool,
        investigator_id: DbId,
    ) -> Result<Vec<UnavailableDate>, sqlx::Error> {
        let query = format!(
            "SELECT {DATE_COLUMNS} FROM investigator_unavailable_dates \
             WHERE investigator_id = $1 \
             ORDER BY unavailable_on ASC"
        );
        sqlx::query_as::<_, UnavailableDate>(&query)
            .bind(investigator_id)
            .fetch_all(pool)
            .await
    }
}
