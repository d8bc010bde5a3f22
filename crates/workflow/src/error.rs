use filature_core::types::DbId;

/// Outcome classification for workflow actions.
///
/// Business-rule rejections and infrastructure faults travel on separate
/// variants so callers never conflate "the rule said no" with "the
/// database was unreachable".
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// An expected, user-facing business-rule rejection. The reason is
    /// surfaced verbatim and never logged as a system fault.
    #[error("{0}")]
    Rejected(String),

    /// The referenced entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// The pre-checked state changed before the guarded mutation ran
    /// (lost race); the caller may retry.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A persistence fault. Full detail is logged server-side; callers
    /// see a generic failure.
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    /// Stored data violated an engine invariant (e.g. an unknown status
    /// id). Logged server-side like an infrastructure fault.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WorkflowError {
    /// Shorthand for rejecting with a validation reason.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }
}
