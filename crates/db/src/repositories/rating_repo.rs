//! Repository for the `mandate_ratings` table.

use sqlx::PgPool;

use filature_core::types::DbId;

use crate::models::rating::MandateRating;

/// Column list for `mandate_ratings` queries.
const COLUMNS: &str =
    "id, mandate_id, agency_id, investigator_id, score, comment, created_at";

/// Provides operations for completion ratings.
pub struct RatingRepo;

impl RatingRepo {
    /// Insert a rating for a completed mandate.
    ///
    /// The `uq_mandate_ratings_mandate` constraint rejects a second
    /// rating; callers surface the violation as a conflict.
    pub async fn create(
        pool: &PgPool,
        mandate_id: DbId,
        agency_id: DbId,
        investigator_id: DbId,
        score: i16,
        comment: Option<&str>,
    ) -> Result<MandateRating, sqlx::Error> {
        let query = format!(
            "INSERT INTO mandate_ratings \
                 (mandate_id, agency_id, investigator_id, score, comment) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MandateRating>(&query)
            .bind(mandate_id)
            .bind(agency_id)
            .bind(investigator_id)
            .bind(score)
            .bind(comment)
            .fetch_one(pool)
            .await
    }

    /// Find the rating for a mandate, if any.
    pub async fn find_by_mandate(
        pool: &PgPool,
        mandate_id: DbId,
    ) -> Result<Option<MandateRating>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM mandate_ratings WHERE mandate_id = $1");
        sqlx::query_as::<_, MandateRating>(&query)
            .bind(mandate_id)
            .fetch_optional(pool)
            .await
    }
}
