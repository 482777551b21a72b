//! Blocked email repository.
//!
//! A blocked-email row is the soft-ban record: its existence keeps the
//! account out, and deleting it is the restore action. The delete returns the
//! affected email so the caller can run the compensating notification.

use chrono::Utc;
use sqlx::{PgPool, Row};

use exship_core::{BlockedEmailId, Email};

use super::RepositoryError;

/// Repository for blocked-email database operations.
pub struct BlockedEmailRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BlockedEmailRepository<'a> {
    /// Create a new blocked email repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a block record for an email, returning its id.
    ///
    /// Re-blocking an already blocked email refreshes the reason and returns
    /// the existing row's id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn block(
        &self,
        email: &Email,
        reason: &str,
    ) -> Result<BlockedEmailId, RepositoryError> {
        let row = sqlx::query(
            r"
            INSERT INTO blocked_email (email, reason, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE
            SET reason = EXCLUDED.reason
            RETURNING id
            ",
        )
        .bind(email.as_str())
        .bind(reason)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        Ok(row.try_get("id")?)
    }

    /// Delete a block record, returning the email it covered.
    ///
    /// `None` means no such record - the caller must treat that as `NotFound`
    /// and skip every compensating side effect.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn delete(&self, id: BlockedEmailId) -> Result<Option<Email>, RepositoryError> {
        let row = sqlx::query(
            r"
            DELETE FROM blocked_email
            WHERE id = $1
            RETURNING email
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| {
            let raw: String = r.try_get("email")?;
            Email::parse(&raw).map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
            })
        })
        .transpose()
    }
}
