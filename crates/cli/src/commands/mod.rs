//! CLI command implementations.

pub mod migrate;
pub mod user;

use secrecy::SecretString;
use thiserror::Error;

/// Errors shared by the CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Repository error: {0}")]
    Repository(#[from] exship_server::db::RepositoryError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Resolve the database URL from the environment.
///
/// Mirrors the server's lookup: `EXSHIP_DATABASE_URL` first, generic
/// `DATABASE_URL` as fallback.
pub(crate) fn database_url() -> Result<SecretString, CommandError> {
    dotenvy::dotenv().ok();

    std::env::var("EXSHIP_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("EXSHIP_DATABASE_URL"))
}
