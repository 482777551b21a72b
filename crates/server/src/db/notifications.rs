//! Notification repository for database operations.
//!
//! Notifications are keyed by the owning user's email. Reads and the
//! ownership check on delete compare emails case-insensitively; a delete
//! whose id exists but belongs to someone else matches zero rows, exactly
//! like a missing id, so existence never leaks.

use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use exship_core::{Email, NotificationId};

use super::RepositoryError;
use crate::models::notification::Notification;

/// Ceiling on a single notification listing.
const MAX_NOTIFICATIONS: i64 = 50;

/// Repository for notification database operations.
pub struct NotificationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> NotificationRepository<'a> {
    /// Create a new notification repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an unread notification, returning its id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        user_email: &Email,
        title: &str,
        message: &str,
    ) -> Result<NotificationId, RepositoryError> {
        let row = sqlx::query(
            r"
            INSERT INTO notification (user_email, title, message, read, created_at)
            VALUES ($1, $2, $3, FALSE, $4)
            RETURNING id
            ",
        )
        .bind(user_email.as_str())
        .bind(title)
        .bind(message)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        Ok(row.try_get("id")?)
    }

    /// Mark a notification read.
    ///
    /// Idempotent: an already-read notification stays read and an unknown id
    /// matches zero rows; neither is an error. Returns the matched count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn mark_read(&self, id: NotificationId) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE notification
            SET read = TRUE
            WHERE id = $1
            ",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete a notification owned by the given email.
    ///
    /// Both the id and the owning email must match. Returns the deleted
    /// count; the caller turns zero into `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_owned(
        &self,
        id: NotificationId,
        owner_email: &Email,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM notification
            WHERE id = $1 AND lower(user_email) = $2
            ",
        )
        .bind(id)
        .bind(owner_email.normalized())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// List notifications for an email, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_email(
        &self,
        email: &Email,
    ) -> Result<Vec<Notification>, RepositoryError> {
        let rows = sqlx::query(
            r"
            SELECT id, user_email, title, message, read, created_at
            FROM notification
            WHERE lower(user_email) = $1
            ORDER BY created_at DESC
            LIMIT $2
            ",
        )
        .bind(email.normalized())
        .bind(MAX_NOTIFICATIONS)
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(row_to_notification).collect()
    }
}

fn row_to_notification(row: &PgRow) -> Result<Notification, RepositoryError> {
    Ok(Notification {
        id: row.try_get("id")?,
        user_email: row.try_get("user_email")?,
        title: row.try_get("title")?,
        message: row.try_get("message")?,
        read: row.try_get("read")?,
        created_at: row.try_get("created_at")?,
    })
}
