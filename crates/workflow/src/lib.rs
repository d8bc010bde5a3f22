//! The mandate lifecycle workflow engine.
//!
//! Sequences every state-changing mandate action: load the validation
//! context from persistence, consult the pure rules in `filature-core`,
//! perform the guarded mutation through `filature-db`, and publish the
//! post-commit event to `filature-events`. Events — and therefore
//! notifications — are emitted only after the mutation is confirmed.

pub mod error;
pub mod service;
pub mod snapshot;

pub use error::WorkflowError;
pub use service::WorkflowService;
