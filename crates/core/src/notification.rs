//! Notification type tags.
//!
//! Every notification row carries one of these tags so clients can pick an
//! icon and deep-link target without parsing the message text. The list is
//! mirrored by a CHECK constraint on `notifications.notification_type`.

/// An agency accepted the investigator's candidature.
pub const NOTIF_CANDIDATURE_ACCEPTED: &str = "candidature_accepted";

/// An agency rejected the investigator's candidature.
pub const NOTIF_CANDIDATURE_REJECTED: &str = "candidature_rejected";

/// The investigator was directly assigned to a mandate.
pub const NOTIF_MANDATE_ASSIGNED: &str = "mandate_assigned";

/// The investigator was removed from a mandate.
pub const NOTIF_MANDATE_UNASSIGNED: &str = "mandate_unassigned";

/// A mandate the investigator is assigned to changed status.
pub const NOTIF_MANDATE_UPDATE: &str = "mandate_update";

/// A new mandate was posted.
pub const NOTIF_NEW_MANDATE: &str = "new_mandate";

/// All valid notification type tags.
pub const VALID_NOTIFICATION_TYPES: &[&str] = &[
    NOTIF_CANDIDATURE_ACCEPTED,
    NOTIF_CANDIDATURE_REJECTED,
    NOTIF_MANDATE_ASSIGNED,
    NOTIF_MANDATE_UNASSIGNED,
    NOTIF_MANDATE_UPDATE,
    NOTIF_NEW_MANDATE,
];

/// Validate that a notification type tag is one of the accepted values.
pub fn validate_notification_type(notification_type: &str) -> Result<(), String> {
    if VALID_NOTIFICATION_TYPES.contains(&notification_type) {
        Ok(())
    } else {
        Err(format!(
            "Invalid notification type '{notification_type}'. Must be one of: {}",
            VALID_NOTIFICATION_TYPES.join(", ")
        ))
    }
}
