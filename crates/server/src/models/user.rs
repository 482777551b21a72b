//! User domain types.
//!
//! User identities are issued by the external identity provider; the local
//! record tracks the mirrored profile plus the soft-delete state that drives
//! the block/restore flow.

use chrono::{DateTime, Utc};
use serde::Serialize;

use exship_core::{Email, Role, UserId};

/// A user record (domain type).
#[derive(Debug, Clone)]
pub struct User {
    /// Identity-provider-issued user id.
    pub id: UserId,
    /// The user's email address.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Authorization role.
    pub role: Role,
    /// Soft-delete flag; a deleted user keeps their row.
    pub is_deleted: bool,
    /// When the user was soft-deleted.
    pub deleted_at: Option<DateTime<Utc>>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Projection of a soft-deleted user for the admin listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub deleted_at: Option<DateTime<Utc>>,
}
