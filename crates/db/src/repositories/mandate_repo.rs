//! Repository for the `mandates` table.
//!
//! Every status-changing statement carries its expected current state in
//! the WHERE clause, so two racing workflow calls cannot both win: the
//! loser's UPDATE matches zero rows and is reported as such. The
//! validation pre-checks in the workflow crate are advisory; these
//! conditional updates are the authority.

use sqlx::PgPool;

use filature_core::status::{MandateStatus, StatusId};
use filature_core::types::DbId;

use crate::models::mandate::{CreateMandate, Mandate, MandateListQuery};

/// Column list for `mandates` queries.
const COLUMNS: &str = "\
    id, agency_id, title, mandate_type, description, city, region, \
    postal_code, latitude, longitude, date_required, duration_days, \
    priority, budget_cad_cents, assignment_type, status_id, assigned_to, \
    created_at, updated_at";

/// Maximum page size for mandate listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for mandate listing.
const DEFAULT_LIMIT: i64 = 50;

/// Provides CRUD and guarded status operations for mandates.
pub struct MandateRepo;

impl MandateRepo {
    /// Insert a new mandate in `open` status, unassigned.
    ///
    /// Direct-assignment mandates are also born `open`; the workflow
    /// engine immediately runs the validated assignment afterwards.
    pub async fn create(
        pool: &PgPool,
        agency_id: DbId,
        input: &CreateMandate,
        priority: &str,
        assignment_type: &str,
        postal_code: Option<&str>,
    ) -> Result<Mandate, sqlx::Error> {
        let query = format!(
            "INSERT INTO mandates \
                 (agency_id, title, mandate_type, description, city, region, \
                  postal_code, latitude, longitude, date_required, duration_days, \
                  priority, budget_cad_cents, assignment_type) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Mandate>(&query)
            .bind(agency_id)
            .bind(&input.title)
            .bind(&input.mandate_type)
            .bind(&input.description)
            .bind(&input.city)
            .bind(&input.region)
            .bind(postal_code)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.date_required)
            .bind(input.duration_days)
            .bind(priority)
            .bind(input.budget_cad_cents)
            .bind(assignment_type)
            .fetch_one(pool)
            .await
    }

    /// Find a mandate by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Mandate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM mandates WHERE id = $1");
        sqlx::query_as::<_, Mandate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Atomically assign an investigator to an open, unassigned mandate
    /// and move it to `in-progress`.
    ///
    /// Returns the updated row, or `None` when the mandate was no longer
    /// open and unassigned — i.e. a concurrent assignment won.
    pub async fn assign_if_open(
        pool: &PgPool,
        mandate_id: DbId,
        investigator_id: DbId,
    ) -> Result<Option<Mandate>, sqlx::Error> {
        let query = format!(
            "UPDATE mandates \
             SET assigned_to = $2, status_id = $3, updated_at = NOW() \
             WHERE id = $1 AND status_id = $4 AND assigned_to IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Mandate>(&query)
            .bind(mandate_id)
            .bind(investigator_id)
            .bind(MandateStatus::InProgress.id())
            .bind(MandateStatus::Open.id())
            .fetch_optional(pool)
            .await
    }

    /// Atomically clear the expected assignee from a mandate in `from`
    /// status and reopen it.
    ///
    /// The expected investigator id is part of the predicate, so an
    /// interleaved unassign/reassign makes this a no-op rather than
    /// silently clearing someone else's assignment. Returns the updated
    /// row, or `None` when the expected state no longer held.
    pub async fn release_assignment(
        pool: &PgPool,
        mandate_id: DbId,
        expected_investigator_id: DbId,
        from: MandateStatus,
    ) -> Result<Option<Mandate>, sqlx::Error> {
        let query = format!(
            "UPDATE mandates \
             SET assigned_to = NULL, status_id = $3, updated_at = NOW() \
             WHERE id = $1 AND status_id = $4 AND assigned_to = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Mandate>(&query)
            .bind(mandate_id)
            .bind(expected_investigator_id)
            .bind(MandateStatus::Open.id())
            .bind(from.id())
            .fetch_optional(pool)
            .await
    }

    /// Atomically move a mandate from `from` to `to`, leaving the
    /// assignment untouched.
    ///
    /// Returns the updated row, or `None` when the mandate was not in
    /// `from` status (stale read or lost race).
    pub async fn set_status_guarded(
        pool: &PgPool,
        mandate_id: DbId,
        from: MandateStatus,
        to: MandateStatus,
    ) -> Result<Option<Mandate>, sqlx::Error> {
        let query = format!(
            "UPDATE mandates \
             SET status_id = $3, updated_at = NOW() \
             WHERE id = $1 AND status_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Mandate>(&query)
            .bind(mandate_id)
            .bind(from.id())
            .bind(to.id())
            .fetch_optional(pool)
            .await
    }

    /// Number of mandates currently in progress for an investigator
    /// (workload cap input).
    pub async fn count_in_progress_for_investigator(
        pool: &PgPool,
        investigator_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM mandates WHERE assigned_to = $1 AND status_id = $2",
        )
        .bind(investigator_id)
        .bind(MandateStatus::InProgress.id())
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }

    /// List mandates with optional filters and pagination, newest first.
    pub async fn list(
        pool: &PgPool,
        status_id: Option<StatusId>,
        params: &MandateListQuery,
    ) -> Result<Vec<Mandate>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = params.offset.unwrap_or(0);

        // Build the WHERE clause and track the next bind parameter index.
        let mut conditions: Vec<String> = Vec::new();
        let mut bind_idx: u32 = 1;

        if status_id.is_some() {
            conditions.push(format!("status_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.region.is_some() {
            conditions.push(format!("region = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.agency_id.is_some() {
            conditions.push(format!("agency_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.assigned_to.is_some() {
            conditions.push(format!("assigned_to = ${bind_idx}"));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM mandates \
             {where_clause} \
             ORDER BY created_at DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, Mandate>(&query);

        if let Some(sid) = status_id {
            q = q.bind(sid);
        }
        if let Some(region) = &params.region {
            q = q.bind(region);
        }
        if let Some(agency_id) = params.agency_id {
            q = q.bind(agency_id);
        }
        if let Some(assigned_to) = params.assigned_to {
            q = q.bind(assigned_to);
        }

        q = q.bind(limit).bind(offset);

        q.fetch_all(pool).await
    }
}
