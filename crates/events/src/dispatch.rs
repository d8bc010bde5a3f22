//! Event-to-notification dispatch service.
//!
//! [`NotificationDispatcher`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! broadcast channel and records one `notifications` row per received
//! [`WorkflowEvent`]. It runs as a long-lived background task and shuts
//! down gracefully when the bus sender is dropped.
//!
//! Dispatch failures are logged and swallowed: notification delivery is a
//! non-critical side channel, never part of the workflow's transactional
//! contract.

use tokio::sync::broadcast;

use filature_core::notification::{
    NOTIF_CANDIDATURE_ACCEPTED, NOTIF_CANDIDATURE_REJECTED, NOTIF_MANDATE_ASSIGNED,
    NOTIF_MANDATE_UNASSIGNED, NOTIF_MANDATE_UPDATE,
};
use filature_db::models::notification::CreateNotification;
use filature_db::repositories::NotificationRepo;
use filature_db::DbPool;

use crate::bus::{
    WorkflowEvent, EVENT_CANDIDATURE_ACCEPTED, EVENT_CANDIDATURE_REJECTED,
    EVENT_MANDATE_ASSIGNED, EVENT_MANDATE_STATUS_CHANGED, EVENT_MANDATE_UNASSIGNED,
};

/// Background service that turns workflow events into notifications.
pub struct NotificationDispatcher;

impl NotificationDispatcher {
    /// Run the dispatch loop.
    ///
    /// Subscribes to the event bus via the provided `receiver` and
    /// records a notification for every event it receives. The loop
    /// exits when the channel is closed (i.e. the
    /// [`EventBus`](crate::bus::EventBus) is dropped).
    pub async fn run(pool: DbPool, mut receiver: broadcast::Receiver<WorkflowEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = Self::dispatch(&pool, &event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            recipient = event.recipient_user_id,
                            "Failed to record notification"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        skipped = n,
                        "Notification dispatcher lagged, some events were dropped"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification dispatcher shutting down");
                    break;
                }
            }
        }
    }

    /// Record a single notification for an event.
    async fn dispatch(pool: &DbPool, event: &WorkflowEvent) -> Result<(), sqlx::Error> {
        let Some(content) = render(event) else {
            tracing::warn!(
                event_type = %event.event_type,
                "Unknown event type, skipping notification"
            );
            return Ok(());
        };

        let id = NotificationRepo::create(
            pool,
            &CreateNotification {
                user_id: event.recipient_user_id,
                mandate_id: event.mandate_id,
                title: content.title,
                message: content.message,
                notification_type: content.notification_type.to_string(),
            },
        )
        .await?;

        tracing::debug!(
            notification_id = id,
            event_type = %event.event_type,
            recipient = event.recipient_user_id,
            "Notification recorded"
        );
        Ok(())
    }
}

/// Rendered notification content for one event.
#[derive(Debug, PartialEq, Eq)]
pub struct NotificationContent {
    pub title: String,
    pub message: String,
    pub notification_type: &'static str,
}

/// Map an event to user-facing notification content.
///
/// Returns `None` for event types the dispatcher does not know, which
/// are skipped with a warning rather than failing the loop.
pub fn render(event: &WorkflowEvent) -> Option<NotificationContent> {
    let title_ref = event.mandate_title().unwrap_or("a mandate");

    let content = match event.event_type.as_str() {
        EVENT_CANDIDATURE_ACCEPTED => NotificationContent {
            title: "Candidature accepted".to_string(),
            message: format!("Your candidature for \"{title_ref}\" was accepted."),
            notification_type: NOTIF_CANDIDATURE_ACCEPTED,
        },
        EVENT_CANDIDATURE_REJECTED => NotificationContent {
            title: "Candidature declined".to_string(),
            message: format!("Your candidature for \"{title_ref}\" was not selected."),
            notification_type: NOTIF_CANDIDATURE_REJECTED,
        },
        EVENT_MANDATE_ASSIGNED => NotificationContent {
            title: "New assignment".to_string(),
            message: format!("You were assigned to \"{title_ref}\"."),
            notification_type: NOTIF_MANDATE_ASSIGNED,
        },
        EVENT_MANDATE_UNASSIGNED => NotificationContent {
            title: "Assignment removed".to_string(),
            message: format!("You were removed from \"{title_ref}\"."),
            notification_type: NOTIF_MANDATE_UNASSIGNED,
        },
        EVENT_MANDATE_STATUS_CHANGED => {
            let status = event
                .payload
                .get("new_status")
                .and_then(|v| v.as_str())
                .unwrap_or("updated");
            NotificationContent {
                title: "Mandate updated".to_string(),
                message: format!("The mandate \"{title_ref}\" is now {status}."),
                notification_type: NOTIF_MANDATE_UPDATE,
            }
        }
        _ => return None,
    };

    Some(content)
}
