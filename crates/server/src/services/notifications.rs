//! Notification dispatcher.
//!
//! Sole writer and deleter of notification records, and home of the
//! restore saga. The saga is explicitly two-step and non-transactional:
//!
//! 1. Delete the blocked-email row. No row means `NotFound` and nothing else
//!    happens.
//! 2. Best-effort compensation: reinstate the user row, insert the
//!    "account restored" notification, and spawn the restoration email.
//!    Failures in step 2 are logged and never roll back step 1.

use exship_core::{BlockedEmailId, Email, NotificationId};

use crate::db::{
    BlockedEmailRepository, NotificationRepository, RepositoryError, UserRepository,
};
use crate::models::notification::Notification;
use crate::state::AppState;

/// Title used for the account-restored notification record.
const RESTORED_TITLE: &str = "Account restored";

/// Dispatcher for notification records and their side effects.
pub struct NotificationDispatcher<'a> {
    state: &'a AppState,
}

impl<'a> NotificationDispatcher<'a> {
    /// Create a dispatcher backed by the shared application state.
    #[must_use]
    pub const fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Create a notification for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn notify(
        &self,
        email: &Email,
        title: &str,
        message: &str,
    ) -> Result<NotificationId, RepositoryError> {
        NotificationRepository::new(self.state.pool())
            .create(email, title, message)
            .await
    }

    /// Mark a notification read; unknown ids and repeat calls are no-ops.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn mark_read(&self, id: NotificationId) -> Result<(), RepositoryError> {
        let matched = NotificationRepository::new(self.state.pool())
            .mark_read(id)
            .await?;
        if matched == 0 {
            tracing::debug!(notification_id = %id, "mark_read matched no rows");
        }
        Ok(())
    }

    /// Delete a notification the caller owns.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when nothing was deleted - either
    /// the id does not exist or it belongs to a different email; the two
    /// cases are indistinguishable on purpose.
    pub async fn delete_owned(
        &self,
        id: NotificationId,
        owner_email: &Email,
    ) -> Result<(), RepositoryError> {
        let deleted = NotificationRepository::new(self.state.pool())
            .delete_owned(id, owner_email)
            .await?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// List the caller's notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for(&self, email: &Email) -> Result<Vec<Notification>, RepositoryError> {
        NotificationRepository::new(self.state.pool())
            .list_for_email(email)
            .await
    }

    /// Restore a blocked email: delete the block record, then compensate.
    ///
    /// Returns the restored email on success.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when the block record does not
    /// exist; in that case no side effect has happened.
    pub async fn restore_blocked_email(
        &self,
        blocked_id: BlockedEmailId,
    ) -> Result<Email, RepositoryError> {
        let pool = self.state.pool();

        // Step 1: the authoritative change. NotFound short-circuits here.
        let Some(email) = BlockedEmailRepository::new(pool).delete(blocked_id).await? else {
            return Err(RepositoryError::NotFound);
        };

        tracing::info!(email = %email, blocked_id = %blocked_id, "blocked email deleted, restoring account");

        // Step 2: best-effort compensation; failures are logged, never rolled back.
        match UserRepository::new(pool).restore_by_email(&email).await {
            Ok(0) => tracing::warn!(email = %email, "no user row matched the restored email"),
            Ok(_) => {}
            Err(e) => tracing::error!(email = %email, error = %e, "failed to reinstate user row"),
        }

        if let Err(e) = self
            .notify(
                &email,
                RESTORED_TITLE,
                "Your account has been restored. Welcome back!",
            )
            .await
        {
            tracing::error!(email = %email, error = %e, "failed to record restoration notification");
        }

        if let Some(mailer) = self.state.mailer() {
            let mailer = mailer.clone();
            let to = email.as_str().to_owned();
            tokio::spawn(async move {
                if let Err(e) = mailer.send_account_restored(&to).await {
                    tracing::warn!(to = %to, error = %e, "restoration email delivery failed");
                }
            });
        } else {
            tracing::debug!(email = %email, "email notifier disabled, skipping restoration mail");
        }

        Ok(email)
    }
}
