//! Tracking history repository.
//!
//! The tracking log is append-only: events are inserted and listed, never
//! updated or deleted. The shipment reference is deliberately not enforced
//! with a foreign key - listing events for an unknown shipment returns the
//! empty set rather than an error.

use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use exship_core::ShipmentId;

use super::RepositoryError;
use crate::models::shipment::TrackingEvent;

/// Repository for tracking event operations.
pub struct TrackingHistoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TrackingHistoryRepository<'a> {
    /// Create a new tracking history repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Append an event to a shipment's log.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn append(
        &self,
        shipment_id: &str,
        status: &str,
        note: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO tracking_event (shipment_id, status, note, occurred_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(shipment_id)
        .bind(status)
        .bind(note)
        .bind(Utc::now())
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// List a shipment's events in chronological order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_shipment(
        &self,
        shipment_id: &str,
    ) -> Result<Vec<TrackingEvent>, RepositoryError> {
        let rows = sqlx::query(
            r"
            SELECT shipment_id, status, note, occurred_at
            FROM tracking_event
            WHERE shipment_id = $1
            ORDER BY occurred_at ASC
            ",
        )
        .bind(shipment_id)
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(row_to_event).collect()
    }
}

fn row_to_event(row: &PgRow) -> Result<TrackingEvent, RepositoryError> {
    let shipment_id = ShipmentId::parse(&row.try_get::<String, _>("shipment_id")?)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid shipment id: {e}")))?;

    Ok(TrackingEvent {
        shipment_id,
        status: row.try_get("status")?,
        note: row.try_get("note")?,
        occurred_at: row.try_get("occurred_at")?,
    })
}
