//! HTTP middleware stack for the API service.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (assign or propagate `x-request-id`)
//!
//! Identity is not a layer: handlers opt in per route via the extractors in
//! [`auth`], which is how the authorization gate stays uniform instead of
//! per-endpoint ad hoc checks.

pub mod auth;
pub mod request_id;

pub use auth::{Identity, OptionalAuth, RequireAdmin, RequireAuth, VisibilityScope};
pub use request_id::request_id_middleware;
