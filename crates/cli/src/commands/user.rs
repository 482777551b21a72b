//! User management commands.
//!
//! Registers (or refreshes) a local user record mirroring an identity issued
//! by the external provider. Useful for bootstrapping the first admin and in
//! test environments.

use uuid::Uuid;

use exship_core::{Email, Role, UserId};
use exship_server::db::{UserRepository, create_pool};

use super::{CommandError, database_url};

/// Register or refresh a user record.
///
/// When `raw_id` is omitted a fresh UUID is generated, which is handy in
/// development but means the record will not line up with a real
/// identity-provider id.
///
/// # Errors
///
/// Returns an error for an invalid email/id or when the database operation
/// fails.
pub async fn add(
    email: &str,
    name: &str,
    role: &str,
    raw_id: Option<&str>,
) -> Result<(), CommandError> {
    let email = Email::parse(email)
        .map_err(|e| CommandError::InvalidInput(format!("invalid email: {e}")))?;
    let role = Role::resolve(Some(role));
    let id = match raw_id {
        Some(raw) => UserId::parse(raw)
            .map_err(|e| CommandError::InvalidInput(format!("invalid user id: {e}")))?,
        None => UserId::new(Uuid::new_v4()),
    };

    let database_url = database_url()?;
    let pool = create_pool(&database_url).await?;

    UserRepository::new(&pool)
        .upsert(id, &email, name, role)
        .await?;

    tracing::info!(user_id = %id, email = %email, role = %role, "user record registered");
    Ok(())
}
