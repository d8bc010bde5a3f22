//! Repository for the `candidatures` table.

use sqlx::PgPool;

use filature_core::status::CandidatureStatus;
use filature_core::types::DbId;

use crate::models::candidature::{Candidature, CreateCandidature};

/// Column list for `candidatures` queries.
const COLUMNS: &str = "id, mandate_id, investigator_id, status_id, message, created_at";

/// Provides CRUD operations for candidatures.
pub struct CandidatureRepo;

impl CandidatureRepo {
    /// Insert a new candidature in `interested` status.
    ///
    /// The `uq_candidatures_mandate_investigator` constraint rejects a
    /// second application from the same investigator; callers surface the
    /// violation as a conflict.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCandidature,
    ) -> Result<Candidature, sqlx::Error> {
        let query = format!(
            "INSERT INTO candidatures (mandate_id, investigator_id, message) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Candidature>(&query)
            .bind(input.mandate_id)
            .bind(input.investigator_id)
            .bind(&input.message)
            .fetch_one(pool)
            .await
    }

    /// Find a candidature by id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Candidature>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM candidatures WHERE id = $1");
        sqlx::query_as::<_, Candidature>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All candidatures for a mandate, oldest first.
    pub async fn list_for_mandate(
        pool: &PgPool,
        mandate_id: DbId,
    ) -> Result<Vec<Candidature>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM candidatures \
             WHERE mandate_id = $1 \
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Candidature>(&query)
            .bind(mandate_id)
            .fetch_all(pool)
            .await
    }

    /// All candidatures filed by an investigator, newest first.
    pub async fn list_for_investigator(
        pool: &PgPool,
        investigator_id: DbId,
    ) -> Result<Vec<Candidature>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM candidatures \
             WHERE investigator_id = $1 \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Candidature>(&query)
            .bind(investigator_id)
            .fetch_all(pool)
            .await
    }

    /// Resolve a candidature that is still `interested`.
    ///
    /// Returns the updated row, or `None` when the candidature was
    /// missing or already resolved — resolved candidatures are never
    /// mutated again.
    pub async fn resolve_if_interested(
        pool: &PgPool,
        id: DbId,
        to: CandidatureStatus,
    ) -> Result<Option<Candidature>, sqlx::Error> {
        let query = format!(
            "UPDATE candidatures SET status_id = $2 \
             WHERE id = $1 AND status_id = $3 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Candidature>(&query)
            .bind(id)
            .bind(to.id())
            .bind(CandidatureStatus::Interested.id())
            .fetch_optional(pool)
            .await
    }

    /// Reject every still-`interested` sibling of an accepted candidature.
    ///
    /// Returns the rejected rows so the workflow can notify their
    /// investigators.
    pub async fn reject_interested_siblings(
        pool: &PgPool,
        mandate_id: DbId,
        accepted_id: DbId,
    ) -> Result<Vec<Candidature>, sqlx::Error> {
        let query = format!(
            "UPDATE candidatures SET status_id = $3 \
             WHERE mandate_id = $1 AND id <> $2 AND status_id = $4 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Candidature>(&query)
            .bind(mandate_id)
            .bind(accepted_id)
            .bind(CandidatureStatus::Rejected.id())
            .bind(CandidatureStatus::Interested.id())
            .fetch_all(pool)
            .await
    }
}
