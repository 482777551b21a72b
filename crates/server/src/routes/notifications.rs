//! Notification route handlers.
//!
//! All three surfaces act on behalf of the calling identity: the listing and
//! the delete take the owning email from the resolved identity, never from a
//! caller-supplied parameter.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use exship_core::NotificationId;

use crate::error::{ApiError, Result};
use crate::middleware::auth::RequireAuth;
use crate::models::notification::Notification;
use crate::routes::{ApiJson, OkResponse};
use crate::services::notifications::NotificationDispatcher;
use crate::state::AppState;

/// Create the notification routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/notifications", get(list_notifications))
        .route("/api/notifications/read", post(mark_read))
        .route("/api/notifications/{id}", delete(delete_notification))
}

/// Request for marking a notification read.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkReadRequest {
    pub id: Option<String>,
}

/// Response for the notification listing.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub notifications: Vec<Notification>,
}

/// List the calling identity's notifications, newest first.
///
/// # Errors
///
/// Returns a validation error when the identity carries no email - there is
/// no inbox to read from.
#[instrument(skip_all)]
pub async fn list_notifications(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<ListResponse>> {
    let email = identity.email.as_ref().ok_or_else(|| {
        ApiError::Validation("authenticated email required".to_string())
    })?;

    let notifications = NotificationDispatcher::new(&state).list_for(email).await?;

    Ok(Json(ListResponse { notifications }))
}

/// Mark a notification read.
///
/// Idempotent: repeating the call (or naming an unknown id) still succeeds.
///
/// # Errors
///
/// Returns a validation error when the id is missing or malformed.
#[instrument(skip_all)]
pub async fn mark_read(
    RequireAuth(_identity): RequireAuth,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<MarkReadRequest>,
) -> Result<Json<OkResponse>> {
    let raw = body
        .id
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Validation("id is required".to_string()))?;

    let id = NotificationId::parse(raw)
        .map_err(|_| ApiError::Validation("malformed notification id".to_string()))?;

    NotificationDispatcher::new(&state).mark_read(id).await?;

    Ok(Json(OkResponse::OK))
}

/// Delete a notification the calling identity owns.
///
/// A notification that exists but belongs to someone else is reported as
/// not found, indistinguishable from a missing id.
///
/// # Errors
///
/// Returns a validation error for a malformed id or an identity without an
/// email, and `NotFound` when nothing the caller owns matched.
#[instrument(skip_all)]
pub async fn delete_notification(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>> {
    let id = NotificationId::parse(id.trim())
        .map_err(|_| ApiError::Validation("malformed notification id".to_string()))?;

    let email = identity.email.as_ref().ok_or_else(|| {
        ApiError::Validation("authenticated email required".to_string())
    })?;

    NotificationDispatcher::new(&state)
        .delete_owned(id, email)
        .await?;

    Ok(Json(OkResponse::OK))
}
