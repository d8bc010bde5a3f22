//! Assignment validation context loading.
//!
//! Assembles the [`AssignmentSnapshot`] the pure validation rules
//! consult, from the entity rows the orchestrator also needs afterwards
//! (mandate title for event payloads, investigator `user_id` for event
//! addressing). Read failures surface as `sqlx::Error` — infrastructure,
//! not business rules.

use sqlx::PgPool;

use filature_core::status::{AvailabilityStatus, MandateStatus};
use filature_core::types::{DbId, Timestamp};
use filature_core::validation::{AssignmentSnapshot, InvestigatorFacts, MandateFacts};
use filature_db::models::investigator::Investigator;
use filature_db::models::mandate::Mandate;
use filature_db::repositories::{InvestigatorRepo, MandateRepo};

use crate::error::WorkflowError;

/// Everything the orchestrator reads before deciding an assignment: the
/// raw entity rows plus the derived facts for validation.
#[derive(Debug)]
pub struct AssignmentContext {
    pub mandate: Option<Mandate>,
    pub investigator: Option<Investigator>,
    pub snapshot: AssignmentSnapshot,
}

/// Load the assignment context for a (mandate, investigator) pair.
///
/// Missing rows are represented as `None` facts so the validation rules
/// produce their own not-found reasons in the defined order.
pub async fn load_assignment_context(
    pool: &PgPool,
    mandate_id: DbId,
    investigator_id: DbId,
) -> Result<AssignmentContext, WorkflowError> {
    let mandate = MandateRepo::find_by_id(pool, mandate_id).await?;
    let investigator = InvestigatorRepo::find_by_id(pool, investigator_id).await?;

    let mandate_facts = match &mandate {
        Some(m) => Some(mandate_facts(m)?),
        None => None,
    };

    let investigator_facts = match &investigator {
        Some(i) => Some(investigator_facts(pool, i).await?),
        None => None,
    };

    Ok(AssignmentContext {
        mandate,
        investigator,
        snapshot: AssignmentSnapshot {
            mandate: mandate_facts,
            investigator: investigator_facts,
        },
    })
}

/// Build a context for a mandate that has not been persisted yet
/// (direct assignment at creation time). The mandate facts come from the
/// inbound request instead of a row.
pub async fn load_preassignment_context(
    pool: &PgPool,
    date_required: Timestamp,
    investigator_id: DbId,
) -> Result<AssignmentContext, WorkflowError> {
    let investigator = InvestigatorRepo::find_by_id(pool, investigator_id).await?;

    let investigator_facts = match &investigator {
        Some(i) => Some(investigator_facts(pool, i).await?),
        None => None,
    };

    Ok(AssignmentContext {
        mandate: None,
        investigator,
        snapshot: AssignmentSnapshot {
            mandate: Some(MandateFacts {
                id: 0,
                status: MandateStatus::Open,
                assigned_to: None,
                date_required: Some(date_required),
            }),
            investigator: investigator_facts,
        },
    })
}

/// Derive validation facts from a mandate row.
pub fn mandate_facts(mandate: &Mandate) -> Result<MandateFacts, WorkflowError> {
    let status = MandateStatus::from_id(mandate.status_id).ok_or_else(|| {
        WorkflowError::Internal(format!(
            "mandate {} has unknown status id {}",
            mandate.id, mandate.status_id
        ))
    })?;

    Ok(MandateFacts {
        id: mandate.id,
        status,
        assigned_to: mandate.assigned_to,
        date_required: mandate.date_required,
    })
}

/// Derive validation facts from an investigator row, reading the
/// blocked-out dates and current workload.
async fn investigator_facts(
    pool: &PgPool,
    investigator: &Investigator,
) -> Result<InvestigatorFacts, WorkflowError> {
    let availability = AvailabilityStatus::from_id(investigator.availability_status_id)
        .ok_or_else(|| {
            WorkflowError::Internal(format!(
                "investigator {} has unknown availability status id {}",
                investigator.id, investigator.availability_status_id
            ))
        })?;

    let unavailable_dates = InvestigatorRepo::list_unavailable_dates(pool, investigator.id)
        .await?
        .into_iter()
        .map(|d| d.unavailable_on)
        .collect();

    let in_progress_count =
        MandateRepo::count_in_progress_for_investigator(pool, investigator.id).await?;

    Ok(InvestigatorFacts {
        id: investigator.id,
        availability,
        unavailable_dates,
        in_progress_count,
    })
}
