//! Declarative mandate status transition table.
//!
//! Legality and preconditions live together in one reified rule set
//! instead of being scattered across handlers. A pair absent from the
//! table is illegal — that covers self-transitions too, since no entry
//! maps a status onto itself.
//!
//! There is no single initial state: a mandate is born `Open` when posted
//! for public candidature, or `In-Progress` when directly assigned.
//! `Completed` and `Cancelled` end the normal flow, but the table keeps
//! explicit recovery rows (`completed -> in-progress`, `completed -> open`,
//! `expired -> open`) so an agency can correct a mistaken closure.

use crate::status::MandateStatus;

/// One row of the transition table.
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    pub from: MandateStatus,
    pub to: MandateStatus,
    /// Whether the mandate must have an assigned investigator for this
    /// transition to be taken.
    pub requires_investigator: bool,
}

/// Every legal mandate status transition.
pub const TRANSITIONS: &[Transition] = &[
    Transition {
        from: MandateStatus::Open,
        to: MandateStatus::InProgress,
        requires_investigator: true,
    },
    Transition {
        from: MandateStatus::Open,
        to: MandateStatus::Cancelled,
        requires_investigator: false,
    },
    Transition {
        from: MandateStatus::Open,
        to: MandateStatus::Expired,
        requires_investigator: false,
    },
    Transition {
        from: MandateStatus::InProgress,
        to: MandateStatus::Completed,
        requires_investigator: true,
    },
    Transition {
        from: MandateStatus::InProgress,
        to: MandateStatus::Open,
        requires_investigator: false,
    },
    Transition {
        from: MandateStatus::InProgress,
        to: MandateStatus::Cancelled,
        requires_investigator: false,
    },
    Transition {
        from: MandateStatus::Completed,
        to: MandateStatus::InProgress,
        requires_investigator: false,
    },
    Transition {
        from: MandateStatus::Completed,
        to: MandateStatus::Open,
        requires_investigator: false,
    },
    Transition {
        from: MandateStatus::Expired,
        to: MandateStatus::Open,
        requires_investigator: false,
    },
];

/// Look up the table entry for a (from, to) pair.
fn entry(from: MandateStatus, to: MandateStatus) -> Option<&'static Transition> {
    TRANSITIONS.iter().find(|t| t.from == from && t.to == to)
}

/// Check whether a transition from `from` to `to` is declared legal.
pub fn can_transition(from: MandateStatus, to: MandateStatus) -> bool {
    entry(from, to).is_some()
}

/// Whether the (from, to) transition requires an assigned investigator.
///
/// Returns `false` for pairs absent from the table.
pub fn requires_investigator(from: MandateStatus, to: MandateStatus) -> bool {
    entry(from, to).is_some_and(|t| t.requires_investigator)
}

/// All statuses reachable from `from` per the table.
pub fn valid_next_states(from: MandateStatus) -> Vec<MandateStatus> {
    TRANSITIONS
        .iter()
        .filter(|t| t.from == from)
        .map(|t| t.to)
        .collect()
}
