//! Business-rule checks gating every mutating workflow operation.
//!
//! Rule outcomes are values, not errors: a failed check produces
//! [`Decision::Invalid`] with a reason the end user can read, while
//! infrastructure faults (failed persistence reads) stay on the error
//! channel of whoever assembled the [`AssignmentSnapshot`]. Checks run in
//! a fixed order and the first failure wins.

use chrono::NaiveDate;

use crate::status::{AvailabilityStatus, MandateStatus};
use crate::types::{DbId, Timestamp};
use crate::workflow;

/// An investigator may not hold more than this many mandates in
/// `in-progress` at once. Exactly 5 existing blocks a 6th.
pub const MAX_CONCURRENT_IN_PROGRESS: i64 = 5;

/// Minimum lead time between mandate creation and its required date.
pub const MIN_LEAD_TIME_HOURS: i64 = 24;

/// Outcome of a business-rule check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Valid,
    /// The check failed; the reason is surfaced verbatim to the end user.
    Invalid(String),
}

impl Decision {
    fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid(reason.into())
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// The rejection reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Invalid(reason) => Some(reason),
        }
    }

    /// Convert into a `Result`, keeping the reason on the `Err` side.
    pub fn into_result(self) -> Result<(), String> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(reason) => Err(reason),
        }
    }
}

// ---------------------------------------------------------------------------
// Assignment validation
// ---------------------------------------------------------------------------

/// Mandate facts needed to decide an assignment. `None` means the mandate
/// row does not exist.
#[derive(Debug, Clone)]
pub struct MandateFacts {
    pub id: DbId,
    pub status: MandateStatus,
    pub assigned_to: Option<DbId>,
    pub date_required: Option<Timestamp>,
}

/// Investigator facts needed to decide an assignment. `None` means the
/// investigator row does not exist.
#[derive(Debug, Clone)]
pub struct InvestigatorFacts {
    pub id: DbId,
    pub availability: AvailabilityStatus,
    /// Specific calendar days the investigator has marked unavailable.
    pub unavailable_dates: Vec<NaiveDate>,
    /// Current number of mandates assigned to this investigator in
    /// `in-progress` status.
    pub in_progress_count: i64,
}

/// Everything `validate_assignment` consults, read from persistence by the
/// workflow layer before the decision is taken.
#[derive(Debug, Clone)]
pub struct AssignmentSnapshot {
    pub mandate: Option<MandateFacts>,
    pub investigator: Option<InvestigatorFacts>,
}

/// Decide whether the snapshot's investigator may be assigned to its
/// mandate.
///
/// Checks run in order; the first failing check's reason is returned.
/// Re-assigning the investigator already assigned is an idempotent no-op
/// and passes.
pub fn validate_assignment(snapshot: &AssignmentSnapshot) -> Decision {
    let Some(mandate) = &snapshot.mandate else {
        return Decision::invalid("Mandate not found");
    };

    if let Some(assigned) = mandate.assigned_to {
        let same = snapshot.investigator.as_ref().is_some_and(|i| i.id == assigned);
        if !same {
            return Decision::invalid("Mandate is already assigned to another investigator");
        }
    }

    if matches!(
        mandate.status,
        MandateStatus::Completed | MandateStatus::Cancelled | MandateStatus::Expired
    ) {
        return Decision::invalid(format!(
            "Mandate is {} and no longer accepts assignment",
            mandate.status
        ));
    }

    let Some(investigator) = &snapshot.investigator else {
        return Decision::invalid("Investigator not found");
    };

    if investigator.availability == AvailabilityStatus::Unavailable {
        return Decision::invalid("Investigator is currently unavailable");
    }

    let Some(date_required) = mandate.date_required else {
        return Decision::invalid("Mandate has no required date set");
    };

    // Compared by calendar day, not by exact timestamp.
    let required_day = date_required.date_naive();
    if investigator.unavailable_dates.contains(&required_day) {
        return Decision::invalid(format!(
            "Investigator is unavailable on {required_day}"
        ));
    }

    if investigator.in_progress_count >= MAX_CONCURRENT_IN_PROGRESS {
        return Decision::invalid(format!(
            "Investigator already has {MAX_CONCURRENT_IN_PROGRESS} mandates in progress"
        ));
    }

    Decision::Valid
}

// ---------------------------------------------------------------------------
// Date validation
// ---------------------------------------------------------------------------

/// Check a new mandate's required date against `now`.
///
/// `now` is passed in rather than read from the clock so the rule stays
/// pure.
pub fn validate_dates(date_required: Timestamp, now: Timestamp) -> Decision {
    if date_required <= now {
        return Decision::invalid("Required date must be in the future");
    }

    if date_required < now + chrono::Duration::hours(MIN_LEAD_TIME_HOURS) {
        return Decision::invalid(format!(
            "Required date must be at least {MIN_LEAD_TIME_HOURS} hours away"
        ));
    }

    Decision::Valid
}

// ---------------------------------------------------------------------------
// Status transition validation
// ---------------------------------------------------------------------------

/// Check a status change against the transition table plus the assignment
/// invariants: `in-progress` needs an assignee, `open` needs none.
pub fn validate_status_transition(
    current: MandateStatus,
    new: MandateStatus,
    has_assigned_investigator: bool,
) -> Decision {
    if !workflow::can_transition(current, new) {
        return Decision::invalid(format!(
            "Cannot change mandate status from {current} to {new}"
        ));
    }

    if new == MandateStatus::InProgress && !has_assigned_investigator {
        return Decision::invalid(
            "Mandate cannot move to in-progress without an assigned investigator",
        );
    }

    if new == MandateStatus::Open && has_assigned_investigator {
        return Decision::invalid(
            "Assigned investigator must be removed before the mandate can reopen",
        );
    }

    Decision::Valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn mandate_facts() -> MandateFacts {
        MandateFacts {
            id: 1,
            status: MandateStatus::Open,
            assigned_to: None,
            date_required: Some(Utc.with_ymd_and_hms(2030, 6, 15, 9, 0, 0).unwrap()),
        }
    }

    fn investigator_facts() -> InvestigatorFacts {
        InvestigatorFacts {
            id: 7,
            availability: AvailabilityStatus::Available,
            unavailable_dates: Vec::new(),
            in_progress_count: 0,
        }
    }

    fn snapshot() -> AssignmentSnapshot {
        AssignmentSnapshot {
            mandate: Some(mandate_facts()),
            investigator: Some(investigator_facts()),
        }
    }

    // -----------------------------------------------------------------------
    // validate_assignment
    // -----------------------------------------------------------------------

    #[test]
    fn assignment_valid_for_open_unassigned_mandate() {
        assert_eq!(validate_assignment(&snapshot()), Decision::Valid);
    }

    #[test]
    fn assignment_rejects_missing_mandate() {
        let snap = AssignmentSnapshot {
            mandate: None,
            investigator: Some(investigator_facts()),
        };
        let decision = validate_assignment(&snap);
        assert_eq!(decision.reason(), Some("Mandate not found"));
    }

    #[test]
    fn assignment_rejects_mandate_assigned_to_someone_else() {
        let mut snap = snapshot();
        snap.mandate.as_mut().unwrap().assigned_to = Some(99);
        let decision = validate_assignment(&snap);
        assert!(decision.reason().unwrap().contains("another investigator"));
    }

    #[test]
    fn assignment_idempotent_for_same_investigator() {
        let mut snap = snapshot();
        snap.mandate.as_mut().unwrap().assigned_to = Some(7);
        snap.mandate.as_mut().unwrap().status = MandateStatus::InProgress;
        assert!(validate_assignment(&snap).is_valid());
    }

    #[test]
    fn assignment_rejects_terminal_statuses() {
        for status in [
            MandateStatus::Completed,
            MandateStatus::Cancelled,
            MandateStatus::Expired,
        ] {
            let mut snap = snapshot();
            snap.mandate.as_mut().unwrap().status = status;
            let decision = validate_assignment(&snap);
            assert!(
                !decision.is_valid(),
                "{status} mandate must reject assignment"
            );
        }
    }

    #[test]
    fn assignment_rejects_missing_investigator() {
        let snap = AssignmentSnapshot {
            mandate: Some(mandate_facts()),
            investigator: None,
        };
        let decision = validate_assignment(&snap);
        assert_eq!(decision.reason(), Some("Investigator not found"));
    }

    #[test]
    fn assignment_rejects_unavailable_investigator() {
        let mut snap = snapshot();
        snap.investigator.as_mut().unwrap().availability = AvailabilityStatus::Unavailable;
        let decision = validate_assignment(&snap);
        assert!(decision.reason().unwrap().contains("unavailable"));
    }

    #[test]
    fn assignment_allows_busy_investigator() {
        // Only "unavailable" blocks assignment; "busy" does not.
        let mut snap = snapshot();
        snap.investigator.as_mut().unwrap().availability = AvailabilityStatus::Busy;
        assert!(validate_assignment(&snap).is_valid());
    }

    #[test]
    fn assignment_rejects_mandate_without_required_date() {
        let mut snap = snapshot();
        snap.mandate.as_mut().unwrap().date_required = None;
        let decision = validate_assignment(&snap);
        assert!(decision.reason().unwrap().contains("no required date"));
    }

    #[test]
    fn assignment_rejects_unavailable_date_collision_by_calendar_day() {
        let mut snap = snapshot();
        // Mandate requires 2030-06-15 09:00; investigator blocked the whole
        // day, so the differing time-of-day must not matter.
        snap.investigator
            .as_mut()
            .unwrap()
            .unavailable_dates
            .push(NaiveDate::from_ymd_opt(2030, 6, 15).unwrap());
        let decision = validate_assignment(&snap);
        assert!(decision.reason().unwrap().contains("2030-06-15"));
    }

    #[test]
    fn assignment_allows_unavailable_date_on_other_day() {
        let mut snap = snapshot();
        snap.investigator
            .as_mut()
            .unwrap()
            .unavailable_dates
            .push(NaiveDate::from_ymd_opt(2030, 6, 16).unwrap());
        assert!(validate_assignment(&snap).is_valid());
    }

    #[test]
    fn assignment_rejects_sixth_concurrent_mandate() {
        let mut snap = snapshot();
        snap.investigator.as_mut().unwrap().in_progress_count = 5;
        let decision = validate_assignment(&snap);
        assert!(decision.reason().unwrap().contains("5 mandates"));
    }

    #[test]
    fn assignment_allows_fifth_concurrent_mandate() {
        let mut snap = snapshot();
        snap.investigator.as_mut().unwrap().in_progress_count = 4;
        assert!(validate_assignment(&snap).is_valid());
    }

    #[test]
    fn assignment_checks_short_circuit_in_order() {
        // Mandate missing wins over investigator missing.
        let snap = AssignmentSnapshot {
            mandate: None,
            investigator: None,
        };
        assert_eq!(
            validate_assignment(&snap).reason(),
            Some("Mandate not found")
        );

        // Terminal status wins over unavailable investigator.
        let mut snap = snapshot();
        snap.mandate.as_mut().unwrap().status = MandateStatus::Cancelled;
        snap.investigator.as_mut().unwrap().availability = AvailabilityStatus::Unavailable;
        assert!(validate_assignment(&snap)
            .reason()
            .unwrap()
            .contains("cancelled"));
    }

    // -----------------------------------------------------------------------
    // validate_dates
    // -----------------------------------------------------------------------

    #[test]
    fn dates_reject_now() {
        let now = Utc::now();
        let decision = validate_dates(now, now);
        assert!(decision.reason().unwrap().contains("future"));
    }

    #[test]
    fn dates_reject_past() {
        let now = Utc::now();
        assert!(!validate_dates(now - chrono::Duration::hours(1), now).is_valid());
    }

    #[test]
    fn dates_reject_23_hours_out() {
        let now = Utc::now();
        let decision = validate_dates(now + chrono::Duration::hours(23), now);
        assert!(decision.reason().unwrap().contains("24 hours"));
    }

    #[test]
    fn dates_accept_25_hours_out() {
        let now = Utc::now();
        assert!(validate_dates(now + chrono::Duration::hours(25), now).is_valid());
    }

    // -----------------------------------------------------------------------
    // validate_status_transition
    // -----------------------------------------------------------------------

    #[test]
    fn transition_rejects_pairs_outside_table() {
        let decision =
            validate_status_transition(MandateStatus::Cancelled, MandateStatus::Open, false);
        assert!(decision.reason().unwrap().contains("cancelled"));
    }

    #[test]
    fn transition_to_in_progress_requires_assignee() {
        let decision =
            validate_status_transition(MandateStatus::Open, MandateStatus::InProgress, false);
        assert!(decision
            .reason()
            .unwrap()
            .contains("without an assigned investigator"));

        assert!(
            validate_status_transition(MandateStatus::Open, MandateStatus::InProgress, true)
                .is_valid()
        );
    }

    #[test]
    fn transition_to_open_requires_cleared_assignment() {
        let decision =
            validate_status_transition(MandateStatus::InProgress, MandateStatus::Open, true);
        assert!(decision.reason().unwrap().contains("must be removed"));

        assert!(
            validate_status_transition(MandateStatus::InProgress, MandateStatus::Open, false)
                .is_valid()
        );
    }

    #[test]
    fn completion_with_assignee_is_valid() {
        assert!(validate_status_transition(
            MandateStatus::InProgress,
            MandateStatus::Completed,
            true
        )
        .is_valid());
    }

    #[test]
    fn decision_into_result() {
        assert_eq!(Decision::Valid.into_result(), Ok(()));
        assert_eq!(
            Decision::Invalid("nope".into()).into_result(),
            Err("nope".to_string())
        );
    }
}
