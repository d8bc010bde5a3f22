//! Mandate field constants and validation helpers.
//!
//! Priorities and assignment types are stored as plain text columns with
//! CHECK constraints, so the accepted values are declared once here and
//! reused by the DB layer, the API layer, and the migrations' seed data.

/// Routine mandate, default priority.
pub const PRIORITY_NORMAL: &str = "normal";

/// Time-sensitive mandate, listed ahead of normal ones.
pub const PRIORITY_HIGH: &str = "high";

/// Drop-everything mandate.
pub const PRIORITY_URGENT: &str = "urgent";

/// All valid priority values.
pub const VALID_PRIORITIES: &[&str] = &[PRIORITY_NORMAL, PRIORITY_HIGH, PRIORITY_URGENT];

/// Mandate is open for public candidature; born in `open` status.
pub const ASSIGNMENT_PUBLIC: &str = "public";

/// Mandate is assigned directly to a chosen investigator; born in
/// `in-progress` status once the assignment validates.
pub const ASSIGNMENT_DIRECT: &str = "direct";

/// All valid assignment type values.
pub const VALID_ASSIGNMENT_TYPES: &[&str] = &[ASSIGNMENT_PUBLIC, ASSIGNMENT_DIRECT];

/// Validate that a priority string is one of the accepted values.
pub fn validate_priority(priority: &str) -> Result<(), String> {
    if VALID_PRIORITIES.contains(&priority) {
        Ok(())
    } else {
        Err(format!(
            "Invalid priority '{priority}'. Must be one of: {}",
            VALID_PRIORITIES.join(", ")
        ))
    }
}

/// Validate that an assignment type string is one of the accepted values.
pub fn validate_assignment_type(assignment_type: &str) -> Result<(), String> {
    if VALID_ASSIGNMENT_TYPES.contains(&assignment_type) {
        Ok(())
    } else {
        Err(format!(
            "Invalid assignment type '{assignment_type}'. Must be one of: {}",
            VALID_ASSIGNMENT_TYPES.join(", ")
        ))
    }
}
