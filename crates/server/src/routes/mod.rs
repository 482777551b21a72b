//! Route handlers for the JSON API.
//!
//! Every request and response body is an explicit serde struct with
//! camelCase wire names; unknown fields are rejected at the boundary. The
//! [`ApiJson`] and [`ApiQuery`] extractors below replace axum's default
//! rejections so malformed payloads surface through the service error
//! taxonomy (`validation_error`, 400) instead of framework plain text.

pub mod admin;
pub mod notifications;
pub mod quotes;
pub mod search;
pub mod shipments;
pub mod track;

use axum::{
    Router,
    extract::{FromRequest, FromRequestParts, Query, Request},
};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Create the API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(shipments::router())
        .merge(search::router())
        .merge(track::router())
        .merge(quotes::router())
        .merge(notifications::router())
        .merge(admin::router())
}

/// Minimal success acknowledgement shared by mutation endpoints.
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub(crate) const OK: Self = Self { ok: true };
}

/// JSON body extractor whose rejection speaks the error taxonomy.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::Validation(rejection.body_text())),
        }
    }
}

/// Query string extractor whose rejection speaks the error taxonomy.
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::Validation(rejection.body_text())),
        }
    }
}
