//! Integration tests for Exship.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL, run migrations, start the server
//! cargo run -p exship-cli -- migrate
//! cargo run -p exship-server
//!
//! # Run integration tests
//! cargo test -p exship-integration-tests -- --ignored
//! ```
//!
//! Every test is `#[ignore]`d because it needs a running server and database;
//! without that infrastructure the suite passes vacuously.
//!
//! The identity provider is simulated by setting the trusted `x-auth-user-*`
//! headers directly - exactly what the fronting proxy would inject.

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("EXSHIP_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Header names the identity provider injects.
pub const USER_ID_HEADER: &str = "x-auth-user-id";
pub const USER_EMAIL_HEADER: &str = "x-auth-user-email";
pub const USER_ROLE_HEADER: &str = "x-auth-user-role";

/// A client pre-configured with an admin identity.
#[must_use]
pub fn admin_client() -> reqwest::Client {
    client_with_identity(None, Some("admin-tests@example.com"), Some("ADMIN"))
}

/// A client pre-configured with a standard-user identity.
#[must_use]
pub fn user_client(email: &str) -> reqwest::Client {
    client_with_identity(None, Some(email), Some("STANDARD"))
}

/// Build a client whose default headers carry the given identity parts.
#[must_use]
pub fn client_with_identity(
    user_id: Option<&str>,
    email: Option<&str>,
    role: Option<&str>,
) -> reqwest::Client {
    let mut headers = reqwest::header::HeaderMap::new();
    if let Some(id) = user_id {
        headers.insert(USER_ID_HEADER, id.parse().expect("valid header value"));
    }
    if let Some(email) = email {
        headers.insert(USER_EMAIL_HEADER, email.parse().expect("valid header value"));
    }
    if let Some(role) = role {
        headers.insert(USER_ROLE_HEADER, role.parse().expect("valid header value"));
    }

    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .expect("Failed to create HTTP client")
}

/// An anonymous client with no identity headers.
#[must_use]
pub fn anonymous_client() -> reqwest::Client {
    reqwest::Client::new()
}
