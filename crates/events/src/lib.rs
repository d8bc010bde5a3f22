//! Filature workflow event bus and notification dispatch.
//!
//! The workflow engine publishes a [`WorkflowEvent`] after — and only
//! after — a mutation commits. The [`NotificationDispatcher`] consumes
//! those events on a background task and records user-facing
//! notifications. Dispatch is best-effort: a failed notification write is
//! logged and swallowed, never fed back into the workflow result.

pub mod bus;
pub mod dispatch;

pub use bus::{EventBus, WorkflowEvent};
pub use dispatch::NotificationDispatcher;
