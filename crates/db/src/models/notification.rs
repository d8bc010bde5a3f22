//! Notification entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use filature_core::types::{DbId, Timestamp};

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub mandate_id: Option<DbId>,
    pub title: String,
    pub message: String,
    pub notification_type: String,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Insert payload for a new notification.
#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub user_id: DbId,
    pub mandate_id: Option<DbId>,
    pub title: String,
    pub message: String,
    pub notification_type: String,
}

/// Query parameters for the notification list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct NotificationListQuery {
    pub unread_only: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
