//! Public tracking route handler.
//!
//! The tracking number is an unguessable token issued at creation, so this
//! surface needs no identity: knowing the number is the authorization.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::Serialize;
use tracing::instrument;

use crate::db::shipments::ShipmentRepository;
use crate::db::tracking_history::TrackingHistoryRepository;
use crate::error::{ApiError, Result};
use crate::models::shipment::{Shipment, TrackingEvent};
use crate::state::AppState;

/// Create the tracking routes router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/track/{tracking_number}", get(track))
}

/// Tracking response: the shipment plus its chronological event log.
#[derive(Debug, Serialize)]
pub struct TrackResponse {
    pub shipment: Shipment,
    pub history: Vec<TrackingEvent>,
}

/// Look up a shipment by tracking number.
///
/// The history may legitimately be empty; an unknown tracking number is a
/// 404.
#[instrument(skip(state))]
pub async fn track(
    State(state): State<AppState>,
    Path(tracking_number): Path<String>,
) -> Result<Json<TrackResponse>> {
    let Some(shipment) = ShipmentRepository::new(state.pool())
        .find_by_tracking_number(&tracking_number)
        .await?
    else {
        return Err(ApiError::NotFound(
            "no shipment matches that tracking number".to_string(),
        ));
    };

    let history = TrackingHistoryRepository::new(state.pool())
        .list_for_shipment(shipment.shipment_id.as_str())
        .await?;

    Ok(Json(TrackResponse { shipment, history }))
}
