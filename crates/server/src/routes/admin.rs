//! Administrative route handlers: deleted-user listing, block, and restore.
//!
//! Everything here is destructive or reveals other users' data, so the whole
//! surface sits behind [`RequireAdmin`].

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::Serialize;
use tracing::instrument;

use exship_core::{BlockedEmailId, UserId};

use crate::db::blocked_emails::BlockedEmailRepository;
use crate::db::users::UserRepository;
use crate::error::{ApiError, Result};
use crate::middleware::auth::RequireAdmin;
use crate::models::user::DeletedUser;
use crate::routes::OkResponse;
use crate::services::notifications::NotificationDispatcher;
use crate::state::AppState;

/// Reason recorded on administratively created block records.
const BLOCK_REASON: &str = "blocked by administrator";

/// Create the admin routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/users/deleted", get(list_deleted_users))
        .route("/api/admin/users/{id}/block", post(block_user))
        .route(
            "/api/admin/blocked-emails/{id}/restore",
            post(restore_blocked_email),
        )
}

/// Response for the deleted-users listing.
#[derive(Debug, Serialize)]
pub struct DeletedUsersResponse {
    pub users: Vec<DeletedUser>,
}

/// Response for a block action.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockUserResponse {
    pub ok: bool,
    pub blocked_id: BlockedEmailId,
}

/// List soft-deleted users.
#[instrument(skip_all)]
pub async fn list_deleted_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<DeletedUsersResponse>> {
    let users = UserRepository::new(state.pool()).list_deleted().await?;

    Ok(Json(DeletedUsersResponse { users }))
}

/// Soft-delete a user and record the block on their email.
///
/// The user row survives (soft delete); the blocked-email record is what the
/// restore action later removes.
///
/// # Errors
///
/// Returns a validation error for a malformed id and `NotFound` for an
/// unknown user.
#[instrument(skip_all)]
pub async fn block_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BlockUserResponse>> {
    let user_id = UserId::parse(id.trim())
        .map_err(|_| ApiError::Validation("malformed user id".to_string()))?;

    let Some(email) = UserRepository::new(state.pool()).soft_delete(user_id).await? else {
        return Err(ApiError::NotFound("no user with that id".to_string()));
    };

    let blocked_id = BlockedEmailRepository::new(state.pool())
        .block(&email, BLOCK_REASON)
        .await?;

    tracing::info!(user_id = %user_id, "user blocked");

    Ok(Json(BlockUserResponse {
        ok: true,
        blocked_id,
    }))
}

/// Restore a blocked email.
///
/// Deletes the block record and kicks off the compensating side effects
/// (account reinstatement, notification, best-effort email). An unknown id
/// is a 404 and triggers no side effect at all.
///
/// # Errors
///
/// Returns a validation error for a malformed id and `NotFound` when the
/// block record does not exist.
#[instrument(skip_all)]
pub async fn restore_blocked_email(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>> {
    let blocked_id = BlockedEmailId::parse(id.trim())
        .map_err(|_| ApiError::Validation("malformed blocked-email id".to_string()))?;

    NotificationDispatcher::new(&state)
        .restore_blocked_email(blocked_id)
        .await?;

    Ok(Json(OkResponse::OK))
}
