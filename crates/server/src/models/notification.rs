//! Notification domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use exship_core::NotificationId;

/// A notification delivered to a user's inbox, keyed by email.
///
/// Created by system actions (e.g. account restoration), marked read by the
/// owning user, and deleted only when both the id and the owning email match.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub user_email: String,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
