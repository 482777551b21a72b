//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! exs-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `EXSHIP_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//!
//! Migration files live in `crates/server/migrations/` and are embedded into
//! this binary at compile time.

use exship_server::db::create_pool;

use super::{CommandError, database_url};

/// Run the database migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails, or
/// a migration fails to apply.
pub async fn run() -> Result<(), CommandError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
