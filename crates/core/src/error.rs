use crate::types::DbId;

/// Domain-level error shared across the repository, workflow, and API layers.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The referenced entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// An inbound value failed a domain rule (bad priority, bad postal
    /// code, malformed status name, ...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The request conflicts with current state (duplicate candidature,
    /// mandate already assigned, ...).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Missing or invalid credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed to act on this resource.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// An unexpected internal failure. Details are logged server-side.
    #[error("internal error: {0}")]
    Internal(String),
}
