//! Candidature / assignment orchestrator.
//!
//! Every action follows the same sequence: load context, consult the
//! pure validation rules, run the guarded persistence mutation, and only
//! then publish the workflow event that produces notifications. The
//! validation pre-checks are advisory — the conditional UPDATEs in
//! `filature-db` decide races — so a pre-check that passed but a
//! mutation that matched zero rows is reported as a conflict, and no
//! event is published for it.

use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;

use filature_core::geo;
use filature_core::mandate::{
    validate_assignment_type, validate_priority, ASSIGNMENT_DIRECT, ASSIGNMENT_PUBLIC,
    PRIORITY_NORMAL,
};
use filature_core::status::{CandidatureStatus, MandateStatus};
use filature_core::types::DbId;
use filature_core::validation::{
    validate_assignment, validate_dates, validate_status_transition,
};
use filature_db::models::candidature::{Candidature, CreateCandidature};
use filature_db::models::investigator::Investigator;
use filature_db::models::mandate::{CreateMandate, Mandate};
use filature_db::models::rating::MandateRating;
use filature_db::repositories::{
    CandidatureRepo, InvestigatorRepo, MandateRepo, RatingRepo,
};
use filature_events::bus::{
    EVENT_CANDIDATURE_ACCEPTED, EVENT_CANDIDATURE_REJECTED, EVENT_MANDATE_ASSIGNED,
    EVENT_MANDATE_STATUS_CHANGED, EVENT_MANDATE_UNASSIGNED,
};
use filature_events::{EventBus, WorkflowEvent};

use crate::error::WorkflowError;
use crate::snapshot::{load_assignment_context, load_preassignment_context};

/// Orchestrates the validated, multi-entity mandate workflow actions.
pub struct WorkflowService;

impl WorkflowService {
    /// Create a mandate for an agency.
    ///
    /// Public mandates are born `open`. Direct-assignment mandates run
    /// the full assignment validation against the named investigator
    /// before anything is written, then are claimed immediately so they
    /// reach callers already `in-progress`.
    pub async fn create_mandate(
        pool: &PgPool,
        bus: &EventBus,
        agency_id: DbId,
        input: &CreateMandate,
    ) -> Result<Mandate, WorkflowError> {
        let priority = input.priority.as_deref().unwrap_or(PRIORITY_NORMAL);
        validate_priority(priority).map_err(WorkflowError::Rejected)?;

        let assignment_type = input.assignment_type.as_deref().unwrap_or(ASSIGNMENT_PUBLIC);
        validate_assignment_type(assignment_type).map_err(WorkflowError::Rejected)?;

        validate_dates(input.date_required, Utc::now())
            .into_result()
            .map_err(WorkflowError::Rejected)?;

        let postal_code = match &input.postal_code {
            Some(raw) => Some(geo::normalize_postal_code(raw).ok_or_else(|| {
                WorkflowError::rejected(format!("Invalid postal code '{raw}'"))
            })?),
            None => None,
        };

        if assignment_type == ASSIGNMENT_DIRECT {
            let investigator_id = input.direct_investigator_id.ok_or_else(|| {
                WorkflowError::rejected(
                    "Direct-assignment mandates require an investigator",
                )
            })?;

            // Validate the assignment against the inbound mandate facts
            // before creating anything.
            let ctx =
                load_preassignment_context(pool, input.date_required, investigator_id).await?;
            validate_assignment(&ctx.snapshot)
                .into_result()
                .map_err(WorkflowError::Rejected)?;
            let investigator = ctx.investigator.ok_or_else(|| {
                WorkflowError::Internal("validated investigator row missing".into())
            })?;

            let created = MandateRepo::create(
                pool,
                agency_id,
                input,
                priority,
                assignment_type,
                postal_code.as_deref(),
            )
            .await?;

            let assigned = MandateRepo::assign_if_open(pool, created.id, investigator.id)
                .await?
                .ok_or_else(|| {
                    WorkflowError::Conflict("Mandate was claimed concurrently".into())
                })?;

            tracing::info!(
                mandate_id = assigned.id,
                agency_id,
                investigator_id = investigator.id,
                "Mandate created with direct assignment"
            );

            bus.publish(
                WorkflowEvent::new(EVENT_MANDATE_ASSIGNED, investigator.user_id)
                    .with_mandate(assigned.id)
                    .with_payload(json!({ "mandate_title": assigned.title })),
            );

            Ok(assigned)
        } else {
            let created = MandateRepo::create(
                pool,
                agency_id,
                input,
                priority,
                assignment_type,
                postal_code.as_deref(),
            )
            .await?;

            tracing::info!(mandate_id = created.id, agency_id, "Mandate created");

            Ok(created)
        }
    }

    /// File an investigator's candidature for an open public mandate.
    pub async fn apply_to_mandate(
        pool: &PgPool,
        mandate_id: DbId,
        investigator_id: DbId,
        message: Option<String>,
    ) -> Result<Candidature, WorkflowError> {
        let mandate = MandateRepo::find_by_id(pool, mandate_id)
            .await?
            .ok_or(WorkflowError::NotFound {
                entity: "Mandate",
                id: mandate_id,
            })?;

        let status = mandate_status(&mandate)?;
        if status != MandateStatus::Open {
            return Err(WorkflowError::rejected(format!(
                "Mandate is {status} and does not accept candidatures"
            )));
        }
        if mandate.assignment_type != ASSIGNMENT_PUBLIC {
            return Err(WorkflowError::rejected(
                "Mandate is reserved for direct assignment",
            ));
        }

        InvestigatorRepo::find_by_id(pool, investigator_id)
            .await?
            .ok_or(WorkflowError::NotFound {
                entity: "Investigator",
                id: investigator_id,
            })?;

        let created = CandidatureRepo::create(
            pool,
            &CreateCandidature {
                mandate_id,
                investigator_id,
                message,
            },
        )
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "uq_candidatures_mandate_investigator") {
                WorkflowError::Conflict(
                    "Investigator has already applied to this mandate".into(),
                )
            } else {
                WorkflowError::Db(e)
            }
        })?;

        tracing::info!(
            candidature_id = created.id,
            mandate_id,
            investigator_id,
            "Candidature filed"
        );

        Ok(created)
    }

    /// Accept a candidature: claim the mandate for its investigator,
    /// resolve the candidature, reject the remaining siblings, and notify
    /// everyone involved.
    pub async fn accept_candidature(
        pool: &PgPool,
        bus: &EventBus,
        candidature_id: DbId,
    ) -> Result<Candidature, WorkflowError> {
        let candidature = CandidatureRepo::find_by_id(pool, candidature_id)
            .await?
            .ok_or(WorkflowError::NotFound {
                entity: "Candidature",
                id: candidature_id,
            })?;

        if candidature.status_id != CandidatureStatus::Interested.id() {
            return Err(WorkflowError::rejected(
                "Candidature has already been resolved",
            ));
        }

        let ctx = load_assignment_context(
            pool,
            candidature.mandate_id,
            candidature.investigator_id,
        )
        .await?;
        validate_assignment(&ctx.snapshot)
            .into_result()
            .map_err(WorkflowError::Rejected)?;

        // Validation passed, so both rows exist.
        let (Some(mandate), Some(investigator)) = (ctx.mandate, ctx.investigator) else {
            return Err(WorkflowError::Internal(
                "validated assignment rows missing".into(),
            ));
        };

        // Claim the mandate first. The conditional update is the
        // authority against a concurrent accept of another candidature.
        let already_assigned = mandate.assigned_to == Some(investigator.id);
        if !already_assigned {
            MandateRepo::assign_if_open(pool, mandate.id, investigator.id)
                .await?
                .ok_or_else(|| {
                    WorkflowError::Conflict("Mandate was assigned concurrently".into())
                })?;
        }

        let accepted = match CandidatureRepo::resolve_if_interested(
            pool,
            candidature.id,
            CandidatureStatus::Accepted,
        )
        .await?
        {
            Some(accepted) => accepted,
            None => {
                // The candidature was resolved under us. Undo the claim so
                // the mandate does not stay assigned off a stale accept.
                if !already_assigned {
                    let released = MandateRepo::release_assignment(
                        pool,
                        mandate.id,
                        investigator.id,
                        MandateStatus::InProgress,
                    )
                    .await?;
                    if released.is_none() {
                        tracing::error!(
                            mandate_id = mandate.id,
                            investigator_id = investigator.id,
                            "Could not undo assignment after candidature conflict"
                        );
                    }
                }
                return Err(WorkflowError::Conflict(
                    "Candidature was resolved concurrently".into(),
                ));
            }
        };

        let siblings =
            CandidatureRepo::reject_interested_siblings(pool, mandate.id, accepted.id).await?;

        tracing::info!(
            candidature_id,
            mandate_id = mandate.id,
            investigator_id = investigator.id,
            rejected_siblings = siblings.len(),
            "Candidature accepted"
        );

        // Mutations are committed; notifications may flow.
        let payload = json!({ "mandate_title": mandate.title });
        bus.publish(
            WorkflowEvent::new(EVENT_CANDIDATURE_ACCEPTED, investigator.user_id)
                .with_mandate(mandate.id)
                .with_payload(payload.clone()),
        );
        for sibling in &siblings {
            publish_to_investigator(
                pool,
                bus,
                sibling.investigator_id,
                EVENT_CANDIDATURE_REJECTED,
                mandate.id,
                payload.clone(),
            )
            .await;
        }

        Ok(accepted)
    }

    /// Reject a candidature. The mandate itself is untouched.
    pub async fn reject_candidature(
        pool: &PgPool,
        bus: &EventBus,
        candidature_id: DbId,
    ) -> Result<Candidature, WorkflowError> {
        let candidature = CandidatureRepo::find_by_id(pool, candidature_id)
            .await?
            .ok_or(WorkflowError::NotFound {
                entity: "Candidature",
                id: candidature_id,
            })?;

        let rejected = CandidatureRepo::resolve_if_interested(
            pool,
            candidature.id,
            CandidatureStatus::Rejected,
        )
        .await?
        .ok_or_else(|| WorkflowError::rejected("Candidature has already been resolved"))?;

        tracing::info!(
            candidature_id,
            mandate_id = rejected.mandate_id,
            "Candidature rejected"
        );

        let title_payload = match MandateRepo::find_by_id(pool, rejected.mandate_id).await {
            Ok(Some(mandate)) => json!({ "mandate_title": mandate.title }),
            Ok(None) => json!({}),
            Err(e) => {
                tracing::error!(error = %e, "Could not load mandate title for notification");
                json!({})
            }
        };
        publish_to_investigator(
            pool,
            bus,
            rejected.investigator_id,
            EVENT_CANDIDATURE_REJECTED,
            rejected.mandate_id,
            title_payload,
        )
        .await;

        Ok(rejected)
    }

    /// Directly assign an investigator to an open mandate, without a
    /// candidature. Idempotent when the investigator is already assigned.
    pub async fn assign_investigator(
        pool: &PgPool,
        bus: &EventBus,
        mandate_id: DbId,
        investigator_id: DbId,
    ) -> Result<Mandate, WorkflowError> {
        let ctx = load_assignment_context(pool, mandate_id, investigator_id).await?;
        validate_assignment(&ctx.snapshot)
            .into_result()
            .map_err(WorkflowError::Rejected)?;

        let (Some(mandate), Some(investigator)) = (ctx.mandate, ctx.investigator) else {
            return Err(WorkflowError::Internal(
                "validated assignment rows missing".into(),
            ));
        };

        if mandate.assigned_to == Some(investigator.id) {
            return Ok(mandate);
        }

        let assigned = MandateRepo::assign_if_open(pool, mandate.id, investigator.id)
            .await?
            .ok_or_else(|| {
                WorkflowError::Conflict("Mandate was assigned concurrently".into())
            })?;

        tracing::info!(
            mandate_id,
            investigator_id,
            "Investigator assigned to mandate"
        );

        bus.publish(
            WorkflowEvent::new(EVENT_MANDATE_ASSIGNED, investigator.user_id)
                .with_mandate(assigned.id)
                .with_payload(json!({ "mandate_title": assigned.title })),
        );

        Ok(assigned)
    }

    /// Remove the assigned investigator from a mandate and reopen it.
    pub async fn unassign_investigator(
        pool: &PgPool,
        bus: &EventBus,
        mandate_id: DbId,
    ) -> Result<Mandate, WorkflowError> {
        let mandate = MandateRepo::find_by_id(pool, mandate_id)
            .await?
            .ok_or(WorkflowError::NotFound {
                entity: "Mandate",
                id: mandate_id,
            })?;

        let Some(investigator_id) = mandate.assigned_to else {
            return Err(WorkflowError::rejected(
                "Mandate has no assigned investigator",
            ));
        };

        let current = mandate_status(&mandate)?;
        // Validated against the post-clear state: reopening is legal once
        // the assignment is gone.
        validate_status_transition(current, MandateStatus::Open, false)
            .into_result()
            .map_err(WorkflowError::Rejected)?;

        let released =
            MandateRepo::release_assignment(pool, mandate.id, investigator_id, current)
                .await?
                .ok_or_else(|| {
                    WorkflowError::Conflict("Mandate changed concurrently".into())
                })?;

        tracing::info!(mandate_id, investigator_id, "Investigator unassigned");

        publish_to_investigator(
            pool,
            bus,
            investigator_id,
            EVENT_MANDATE_UNASSIGNED,
            released.id,
            json!({ "mandate_title": released.title }),
        )
        .await;

        Ok(released)
    }

    /// Apply a generic validated status transition (complete, cancel,
    /// expire, recovery reopen of unassigned mandates).
    ///
    /// Transitions to `open` with an investigator still assigned are
    /// rejected here; [`unassign_investigator`](Self::unassign_investigator)
    /// is the operation that clears an assignment.
    pub async fn transition_status(
        pool: &PgPool,
        bus: &EventBus,
        mandate_id: DbId,
        new_status_name: &str,
    ) -> Result<Mandate, WorkflowError> {
        let new_status = MandateStatus::parse(new_status_name).ok_or_else(|| {
            WorkflowError::rejected(format!("Unknown mandate status '{new_status_name}'"))
        })?;

        let mandate = MandateRepo::find_by_id(pool, mandate_id)
            .await?
            .ok_or(WorkflowError::NotFound {
                entity: "Mandate",
                id: mandate_id,
            })?;

        let current = mandate_status(&mandate)?;
        validate_status_transition(current, new_status, mandate.assigned_to.is_some())
            .into_result()
            .map_err(WorkflowError::Rejected)?;

        let updated = MandateRepo::set_status_guarded(pool, mandate.id, current, new_status)
            .await?
            .ok_or_else(|| WorkflowError::Conflict("Mandate changed concurrently".into()))?;

        tracing::info!(
            mandate_id,
            from = %current,
            to = %new_status,
            "Mandate status changed"
        );

        if let Some(investigator_id) = updated.assigned_to {
            publish_to_investigator(
                pool,
                bus,
                investigator_id,
                EVENT_MANDATE_STATUS_CHANGED,
                updated.id,
                json!({
                    "mandate_title": updated.title,
                    "new_status": new_status.as_str(),
                }),
            )
            .await;
        }

        Ok(updated)
    }

    /// Rate a completed mandate. At most one rating per mandate.
    pub async fn rate_mandate(
        pool: &PgPool,
        mandate_id: DbId,
        score: i16,
        comment: Option<&str>,
    ) -> Result<MandateRating, WorkflowError> {
        let mandate = MandateRepo::find_by_id(pool, mandate_id)
            .await?
            .ok_or(WorkflowError::NotFound {
                entity: "Mandate",
                id: mandate_id,
            })?;

        let status = mandate_status(&mandate)?;
        if status != MandateStatus::Completed {
            return Err(WorkflowError::rejected(
                "Only completed mandates can be rated",
            ));
        }
        let investigator_id = mandate.assigned_to.ok_or_else(|| {
            WorkflowError::Internal("completed mandate has no assignee".into())
        })?;

        let rating = RatingRepo::create(
            pool,
            mandate.id,
            mandate.agency_id,
            investigator_id,
            score,
            comment,
        )
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "uq_mandate_ratings_mandate") {
                WorkflowError::Conflict("Mandate has already been rated".into())
            } else {
                WorkflowError::Db(e)
            }
        })?;

        tracing::info!(mandate_id, score, "Mandate rated");

        Ok(rating)
    }
}

/// Resolve a mandate row's status id, flagging unknown ids as an engine
/// invariant violation rather than a business rejection.
fn mandate_status(mandate: &Mandate) -> Result<MandateStatus, WorkflowError> {
    MandateStatus::from_id(mandate.status_id).ok_or_else(|| {
        WorkflowError::Internal(format!(
            "mandate {} has unknown status id {}",
            mandate.id, mandate.status_id
        ))
    })
}

/// Whether a sqlx error is a violation of the named unique constraint.
fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

/// Publish an event addressed to an investigator's user account.
///
/// Runs after the mutation committed, so a failed user lookup only costs
/// the notification: it is logged and swallowed.
async fn publish_to_investigator(
    pool: &PgPool,
    bus: &EventBus,
    investigator_id: DbId,
    event_type: &str,
    mandate_id: DbId,
    payload: serde_json::Value,
) {
    match InvestigatorRepo::find_by_id(pool, investigator_id).await {
        Ok(Some(Investigator { user_id, .. })) => {
            bus.publish(
                WorkflowEvent::new(event_type, user_id)
                    .with_mandate(mandate_id)
                    .with_payload(payload),
            );
        }
        Ok(None) => {
            tracing::warn!(investigator_id, "Investigator vanished before notification");
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                investigator_id,
                "Could not resolve investigator for notification"
            );
        }
    }
}
