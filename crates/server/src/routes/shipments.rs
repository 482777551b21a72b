//! Shipment route handlers: creation, status lifecycle, and listing.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use exship_core::ShipmentStatus;

use crate::db::shipments::{MAX_LIST_LIMIT, NewShipment, ShipmentRepository};
use crate::db::tracking_history::TrackingHistoryRepository;
use crate::error::{ApiError, Result};
use crate::middleware::auth::{RequireAdmin, RequireAuth};
use crate::models::shipment::Shipment;
use crate::routes::{ApiJson, ApiQuery, OkResponse};
use crate::state::AppState;

/// Create the shipment routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/shipments", post(create_shipment).get(list_shipments))
        .route("/api/shipments/status", post(update_status))
}

/// Request for creating a shipment.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateShipmentRequest {
    /// Origin country code fed into the tracking number (2 letters).
    pub origin_country: Option<String>,
    /// Initial status label; defaults to `created`.
    pub status: Option<String>,
    /// Note attached to the initial status.
    pub status_note: Option<String>,
}

/// Response for a created shipment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShipmentResponse {
    pub ok: bool,
    pub shipment: Shipment,
}

/// Request for a status transition.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateStatusRequest {
    pub shipment_id: Option<String>,
    pub status: Option<String>,
    pub status_note: Option<String>,
}

/// Query parameters for the shipment listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

/// Response for the shipment listing.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub results: Vec<Shipment>,
}

/// Create a shipment owned by the calling identity.
///
/// Identifiers are generated server-side; on the (astronomically unlikely)
/// collision the repository regenerates and retries. An initial tracking
/// event is appended alongside.
///
/// # Errors
///
/// Returns a validation error when the identity carries neither a user id
/// nor an email - a shipment must have an owner reference.
#[instrument(skip_all)]
pub async fn create_shipment(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateShipmentRequest>,
) -> Result<Json<CreateShipmentResponse>> {
    if identity.user_id.is_none() && identity.email.is_none() {
        return Err(ApiError::Validation(
            "identity must carry a user id or email to own a shipment".to_string(),
        ));
    }

    let status = body
        .status
        .as_deref()
        .and_then(ShipmentStatus::parse)
        .unwrap_or_else(ShipmentStatus::created);
    let note = body.status_note.unwrap_or_default();

    let new = NewShipment {
        created_by_user_id: identity.user_id,
        created_by_email: identity.email.as_ref(),
        origin_country: body.origin_country.as_deref(),
        status,
        status_note: &note,
    };

    let shipment = ShipmentRepository::new(state.pool()).create(&new).await?;

    TrackingHistoryRepository::new(state.pool())
        .append(shipment.shipment_id.as_str(), shipment.status.as_str(), &note)
        .await?;

    tracing::info!(
        shipment_id = %shipment.shipment_id,
        tracking_number = %shipment.tracking_number,
        "shipment created"
    );

    Ok(Json(CreateShipmentResponse {
        ok: true,
        shipment,
    }))
}

/// Apply a status transition to a shipment.
///
/// Any status may follow any other - the lifecycle is advisory, and the only
/// label with special handling is `cancelled` (case-insensitive), which
/// stamps `cancelledAt`. The response acknowledges the write even when no
/// shipment matched, mirroring the store's update-one semantics.
///
/// # Errors
///
/// Returns a validation error when `shipmentId` or `status` is missing or
/// empty.
#[instrument(skip_all)]
pub async fn update_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<UpdateStatusRequest>,
) -> Result<Json<OkResponse>> {
    let shipment_id = body
        .shipment_id
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    let status = body.status.as_deref().and_then(ShipmentStatus::parse);

    let (shipment_id, status) = match (shipment_id.is_empty(), status) {
        (false, Some(status)) => (shipment_id, status),
        _ => {
            return Err(ApiError::Validation(
                "shipmentId and status are required".to_string(),
            ));
        }
    };

    let note = body.status_note.unwrap_or_default();

    let matched = ShipmentRepository::new(state.pool())
        .update_status(shipment_id, &status, &note)
        .await?;

    if matched == 0 {
        tracing::warn!(shipment_id, "status update matched no shipment");
    } else {
        TrackingHistoryRepository::new(state.pool())
            .append(shipment_id, status.as_str(), &note)
            .await?;
        tracing::info!(shipment_id, status = %status, "shipment status updated");
    }

    Ok(Json(OkResponse::OK))
}

/// List shipments visible to the calling identity, newest first.
///
/// Admins see the unfiltered set; standard users only what they created. The
/// limit is capped server-side regardless of the requested value.
#[instrument(skip_all)]
pub async fn list_shipments(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<ListResponse>> {
    let scope = identity.visibility_scope();
    let results = ShipmentRepository::new(state.pool())
        .list(&scope, query.limit.unwrap_or(MAX_LIST_LIMIT))
        .await?;

    Ok(Json(ListResponse { results }))
}
