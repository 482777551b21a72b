//! Shipment domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use exship_core::{Email, ShipmentId, ShipmentStatus, TrackingNumber, UserId};

/// A trackable logistics unit.
///
/// `shipment_id` and `tracking_number` are generator-issued, globally unique,
/// and immutable once assigned. At least one of the two ownership fields is
/// always set (enforced by a table constraint).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    /// Human-parseable shipment id (`EXS-YYMMDD-XXXXXX`).
    pub shipment_id: ShipmentId,
    /// Public tracking number (`EX` + year + country + serial + letter).
    pub tracking_number: TrackingNumber,
    /// Owning user id, when the creator had one.
    pub created_by_user_id: Option<UserId>,
    /// Owning email, when the creator had one.
    pub created_by_email: Option<Email>,
    /// Origin country code fed into the tracking number.
    pub origin_country: Option<String>,
    /// Current status label (free text; advisory lifecycle).
    pub status: ShipmentStatus,
    /// Operator note attached to the latest status update.
    pub status_note: String,
    /// When the status last changed.
    pub status_updated_at: Option<DateTime<Utc>>,
    /// Set when the status normalized to `cancelled`; never cleared.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// When the shipment was created.
    pub created_at: DateTime<Utc>,
    /// When the shipment was last touched.
    pub updated_at: DateTime<Utc>,
}

/// Fixed projection returned by the prefix search.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub shipment_id: ShipmentId,
    pub tracking_number: TrackingNumber,
    pub status: ShipmentStatus,
    pub created_at: DateTime<Utc>,
}

/// One entry in a shipment's append-only tracking log.
///
/// The shipment reference is not enforced at write time; listing events for
/// an unknown shipment simply yields the empty set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    pub shipment_id: ShipmentId,
    pub status: ShipmentStatus,
    pub note: String,
    pub occurred_at: DateTime<Utc>,
}
