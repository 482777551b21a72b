//! Database operations for the Exship `PostgreSQL` store.
//!
//! One repository module per logical collection:
//!
//! - `shipments` - shipment records, status lifecycle, prefix search
//! - `tracking_history` - append-only tracking event log
//! - `users` - user records mirrored from the identity provider, soft delete
//! - `notifications` - per-email notification records
//! - `blocked_emails` - soft-ban records; deleting one is the restore action
//!
//! All queries are runtime-bound (`sqlx::query` + `bind`), so the workspace
//! compiles without a live database. Updates are partial-field merges, never
//! whole-row replacement.
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p exship-cli -- migrate
//! ```

pub mod blocked_emails;
pub mod notifications;
pub mod shipments;
pub mod tracking_history;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use thiserror::Error;

pub use blocked_emails::BlockedEmailRepository;
pub use notifications::NotificationRepository;
pub use shipments::ShipmentRepository;
pub use tracking_history::TrackingHistoryRepository;
pub use users::UserRepository;

/// Server-side statement timeout applied to every store round-trip.
const STATEMENT_TIMEOUT_MS: u64 = 5_000;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate identifier).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// Every connection carries a server-side `statement_timeout` so a hung
/// storage round-trip fails the request instead of hanging it, and pool
/// acquisition is bounded as well.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is malformed or the connection cannot be
/// established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    let options = database_url
        .expose_secret()
        .parse::<PgConnectOptions>()?
        .options([("statement_timeout", STATEMENT_TIMEOUT_MS.to_string())]);

    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Whether a sqlx error is a unique-constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        db_err.is_unique_violation()
    } else {
        false
    }
}
