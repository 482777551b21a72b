//! User repository for database operations.
//!
//! User records mirror identities issued by the external provider. Deletion
//! is always soft: the row stays, `is_deleted`/`deleted_at` flip, and the
//! restore flow flips them back.

use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use exship_core::{Email, Role, UserId};

use super::RepositoryError;
use crate::models::user::{DeletedUser, User};

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT id, email, name, role, is_deleted, deleted_at, created_at, updated_at
            FROM app_user
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// Insert or refresh a user record mirrored from the identity provider.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken by a
    /// different user, `RepositoryError::Database` for other failures.
    pub async fn upsert(
        &self,
        id: UserId,
        email: &Email,
        name: &str,
        role: Role,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO app_user (id, email, name, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            ON CONFLICT (id) DO UPDATE
            SET email = EXCLUDED.email,
                name = EXCLUDED.name,
                role = EXCLUDED.role,
                updated_at = EXCLUDED.updated_at
            ",
        )
        .bind(id)
        .bind(email.as_str())
        .bind(name)
        .bind(role.as_str())
        .bind(Utc::now())
        .execute(self.pool)
        .await
        .map_err(|e| {
            if super::is_unique_violation(&e) {
                return RepositoryError::Conflict("email already registered".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(())
    }

    /// List soft-deleted users, most recently deleted first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored email is invalid.
    pub async fn list_deleted(&self) -> Result<Vec<DeletedUser>, RepositoryError> {
        let rows = sqlx::query(
            r"
            SELECT id, name, email, deleted_at
            FROM app_user
            WHERE is_deleted = TRUE
            ORDER BY deleted_at DESC NULLS LAST
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let email = parse_email(&row.try_get::<String, _>("email")?)?;
                Ok(DeletedUser {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    email,
                    deleted_at: row.try_get("deleted_at")?,
                })
            })
            .collect()
    }

    /// Soft-delete a user, returning their email when the row exists.
    ///
    /// Idempotent: re-deleting an already deleted user re-stamps nothing and
    /// still returns the email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn soft_delete(&self, id: UserId) -> Result<Option<Email>, RepositoryError> {
        let row = sqlx::query(
            r"
            UPDATE app_user
            SET is_deleted = TRUE,
                deleted_at = COALESCE(deleted_at, $2),
                updated_at = $2
            WHERE id = $1
            RETURNING email
            ",
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| parse_email(&r.try_get::<String, _>("email")?))
            .transpose()
    }

    /// Clear the soft-delete flag for the user with the given email.
    ///
    /// The email comparison is case-insensitive. Returns the matched count;
    /// a blocked email without a user row matches zero and is fine.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn restore_by_email(&self, email: &Email) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE app_user
            SET is_deleted = FALSE,
                deleted_at = NULL,
                updated_at = $2
            WHERE lower(email) = $1
            ",
        )
        .bind(email.normalized())
        .bind(Utc::now())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

fn parse_email(raw: &str) -> Result<Email, RepositoryError> {
    Email::parse(raw)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid email in database: {e}")))
}

fn row_to_user(row: &PgRow) -> Result<User, RepositoryError> {
    let email = parse_email(&row.try_get::<String, _>("email")?)?;
    let role = Role::resolve(Some(&row.try_get::<String, _>("role")?));

    Ok(User {
        id: row.try_get("id")?,
        email,
        name: row.try_get("name")?,
        role,
        is_deleted: row.try_get("is_deleted")?,
        deleted_at: row.try_get("deleted_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
