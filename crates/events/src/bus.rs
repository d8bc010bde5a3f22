//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`WorkflowEvent`]s. It is
//! shared via `Arc<EventBus>` across the application; handlers publish,
//! the notification dispatcher subscribes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use filature_core::types::DbId;

// ---------------------------------------------------------------------------
// Event type names
// ---------------------------------------------------------------------------

/// An agency accepted a candidature.
pub const EVENT_CANDIDATURE_ACCEPTED: &str = "candidature.accepted";

/// An agency rejected a candidature.
pub const EVENT_CANDIDATURE_REJECTED: &str = "candidature.rejected";

/// An investigator was directly assigned to a mandate.
pub const EVENT_MANDATE_ASSIGNED: &str = "mandate.assigned";

/// An investigator was removed from a mandate.
pub const EVENT_MANDATE_UNASSIGNED: &str = "mandate.unassigned";

/// A mandate changed status while an investigator was assigned.
pub const EVENT_MANDATE_STATUS_CHANGED: &str = "mandate.status_changed";

// ---------------------------------------------------------------------------
// WorkflowEvent
// ---------------------------------------------------------------------------

/// A domain event emitted by the workflow engine after a committed
/// mutation.
///
/// Constructed via [`WorkflowEvent::new`] and enriched with the builder
/// methods [`with_mandate`](WorkflowEvent::with_mandate) and
/// [`with_payload`](WorkflowEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowEvent {
    /// Dot-separated event name, e.g. `"candidature.accepted"`.
    pub event_type: String,

    /// The user this event is addressed to (notification recipient).
    pub recipient_user_id: DbId,

    /// The mandate the event relates to, if any.
    pub mandate_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data, e.g. the
    /// mandate title for message templates.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl WorkflowEvent {
    /// Create a new event addressed to `recipient_user_id`.
    ///
    /// The optional fields default to `None` / empty object.
    pub fn new(event_type: impl Into<String>, recipient_user_id: DbId) -> Self {
        Self {
            event_type: event_type.into(),
            recipient_user_id,
            mandate_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the related mandate to the event.
    pub fn with_mandate(mut self, mandate_id: DbId) -> Self {
        self.mandate_id = Some(mandate_id);
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// The mandate title carried in the payload, if any.
    pub fn mandate_title(&self) -> Option<&str> {
        self.payload.get("mandate_title").and_then(|v| v.as_str())
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`WorkflowEvent`].
pub struct EventBus {
    sender: broadcast::Sender<WorkflowEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are
    /// dropped and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped —
    /// notification delivery is best-effort by contract.
    pub fn publish(&self, event: WorkflowEvent) {
        // Ignore the SendError; it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
