//! Unified error handling with Sentry integration.
//!
//! Provides the boundary `ApiError` type implementing the service error
//! taxonomy. Every route handler returns `Result<T, ApiError>`; lower-layer
//! failures are translated here and nothing crosses the boundary unmapped.
//! Internal failures are captured to Sentry before the client response is
//! rendered, and the rendered message never exposes internal detail.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error type for the API surface.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed required input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No identity could be resolved for the request.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Identity resolved but its role is insufficient.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// No matching record (including ownership mismatches).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Stable machine-checkable error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl ApiError {
    /// The stable machine-checkable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) | Self::Repository(RepositoryError::NotFound) => "not_found",
            Self::Repository(_) | Self::Internal(_) => "internal_error",
        }
    }

    /// The HTTP status this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) | Self::Repository(RepositoryError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            Self::Repository(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry; NotFound from the repository is an
        // expected outcome, not an incident.
        if matches!(
            self,
            Self::Internal(_) | Self::Repository(RepositoryError::Database(_))
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Repository(RepositoryError::NotFound) => "not found".to_string(),
            Self::Repository(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Validation(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg) => msg.clone(),
        };

        (
            status,
            Json(ErrorBody {
                error: self.code(),
                message,
            }),
        )
            .into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let status = err.status();
        let body = ErrorBody {
            error: err.code(),
            message: String::new(),
        };
        (status, serde_json::to_value(&body).unwrap())
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("x".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_repository_not_found_maps_to_404() {
        let err = ApiError::from(RepositoryError::NotFound);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn test_repository_conflict_maps_to_500() {
        let err = ApiError::from(RepositoryError::Conflict("identifier collision".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "internal_error");
    }

    #[test]
    fn test_machine_codes_are_stable() {
        let (_, body) = body_json(ApiError::Validation("bad".into()));
        assert_eq!(body["error"], "validation_error");

        let (_, body) = body_json(ApiError::Forbidden("nope".into()));
        assert_eq!(body["error"], "forbidden");
    }

    #[test]
    fn test_display() {
        let err = ApiError::NotFound("shipment EXS-240101-ABCDEF".to_string());
        assert_eq!(err.to_string(), "Not found: shipment EXS-240101-ABCDEF");
    }
}
