//! Shipment repository for database operations.
//!
//! Owns every write to the shipment status fields and both read paths: the
//! visibility-scoped listing and the identifier prefix search. Generated
//! identifiers are unique by constraint, not by construction, so `create`
//! wraps the insert in a bounded regenerate-on-conflict loop.

use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use exship_core::{Email, ShipmentId, ShipmentStatus, TrackingNumber, UserId};

use super::{RepositoryError, is_unique_violation};
use crate::middleware::auth::VisibilityScope;
use crate::models::shipment::{SearchHit, Shipment};

/// Hard ceiling on list page size, applied regardless of the requested value.
pub const MAX_LIST_LIMIT: i64 = 50;

/// Fixed cap on prefix-search result sets.
pub const SEARCH_RESULT_CAP: i64 = 8;

/// Attempts at inserting freshly generated identifiers before giving up.
const MAX_IDENTIFIER_ATTEMPTS: u32 = 3;

/// Columns hydrating a full [`Shipment`]; the internal row id is never
/// selected, so it cannot leak into projections.
const SHIPMENT_COLUMNS: &str = "shipment_id, tracking_number, created_by_user_id, \
     created_by_email, origin_country, status, status_note, status_updated_at, \
     cancelled_at, created_at, updated_at";

/// Fields for a new shipment; identifiers are generated inside `create`.
#[derive(Debug)]
pub struct NewShipment<'a> {
    pub created_by_user_id: Option<UserId>,
    pub created_by_email: Option<&'a Email>,
    pub origin_country: Option<&'a str>,
    pub status: ShipmentStatus,
    pub status_note: &'a str,
}

/// Repository for shipment database operations.
pub struct ShipmentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShipmentRepository<'a> {
    /// Create a new shipment repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new shipment with freshly generated identifiers.
    ///
    /// Identifier collisions are resolved by regenerating both identifiers
    /// and retrying, at most [`MAX_IDENTIFIER_ATTEMPTS`] times.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when every attempt collided and
    /// `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: &NewShipment<'_>) -> Result<Shipment, RepositoryError> {
        let now = Utc::now();
        let mut attempt = 0;

        loop {
            attempt += 1;
            let shipment_id = ShipmentId::generate();
            let tracking_number = TrackingNumber::generate(new.origin_country);

            let sql = format!(
                r"
                INSERT INTO shipment
                    (shipment_id, tracking_number, created_by_user_id, created_by_email,
                     origin_country, status, status_note, status_updated_at, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8, $8)
                RETURNING {SHIPMENT_COLUMNS}
                "
            );

            let result = sqlx::query(&sql)
                .bind(shipment_id.as_str())
                .bind(tracking_number.as_str())
                .bind(new.created_by_user_id)
                .bind(new.created_by_email.map(Email::as_str))
                .bind(new.origin_country)
                .bind(new.status.as_str())
                .bind(new.status_note)
                .bind(now)
                .fetch_one(self.pool)
                .await;

            match result {
                Ok(row) => return row_to_shipment(&row),
                Err(e) if is_unique_violation(&e) && attempt < MAX_IDENTIFIER_ATTEMPTS => {
                    tracing::warn!(attempt, "generated shipment identifier collided, regenerating");
                }
                Err(e) if is_unique_violation(&e) => {
                    return Err(RepositoryError::Conflict(
                        "identifier generation kept colliding".to_owned(),
                    ));
                }
                Err(e) => return Err(RepositoryError::Database(e)),
            }
        }
    }

    /// Apply a status transition as a partial-field merge.
    ///
    /// Sets `status`, `status_note`, `status_updated_at`, and `updated_at`;
    /// when the new status normalizes to `cancelled`, also stamps
    /// `cancelled_at`. A later non-cancelled status never clears the stamp,
    /// and repeating a cancellation re-stamps it.
    ///
    /// Returns the matched row count; updating an unknown shipment matches
    /// zero rows and is not an error here.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_status(
        &self,
        shipment_id: &str,
        status: &ShipmentStatus,
        note: &str,
    ) -> Result<u64, RepositoryError> {
        let now = Utc::now();

        let result = sqlx::query(
            r"
            UPDATE shipment
            SET status = $2,
                status_note = $3,
                status_updated_at = $4,
                updated_at = $4,
                cancelled_at = CASE WHEN $5 THEN $4 ELSE cancelled_at END
            WHERE shipment_id = $1
            ",
        )
        .bind(shipment_id)
        .bind(status.as_str())
        .bind(note)
        .bind(now)
        .bind(status.is_cancelled())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// List shipments visible under the given scope, newest first.
    ///
    /// The requested limit is capped at [`MAX_LIST_LIMIT`]. A
    /// [`VisibilityScope::Nothing`] scope short-circuits to the empty set
    /// without touching the store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        scope: &VisibilityScope,
        limit: i64,
    ) -> Result<Vec<Shipment>, RepositoryError> {
        let limit = limit.clamp(1, MAX_LIST_LIMIT);

        let rows = match scope {
            VisibilityScope::Nothing => return Ok(Vec::new()),
            VisibilityScope::All => {
                let sql = format!(
                    r"
                    SELECT {SHIPMENT_COLUMNS}
                    FROM shipment
                    ORDER BY created_at DESC
                    LIMIT $1
                    "
                );
                sqlx::query(&sql).bind(limit).fetch_all(self.pool).await?
            }
            VisibilityScope::Owner { user_id, email } => {
                let sql = format!(
                    r"
                    SELECT {SHIPMENT_COLUMNS}
                    FROM shipment
                    WHERE ($1::uuid IS NOT NULL AND created_by_user_id = $1)
                       OR ($2::text IS NOT NULL AND lower(created_by_email) = $2)
                    ORDER BY created_at DESC
                    LIMIT $3
                    "
                );
                sqlx::query(&sql)
                    .bind(user_id)
                    .bind(email.as_deref())
                    .bind(limit)
                    .fetch_all(self.pool)
                    .await?
            }
        };

        rows.iter().map(row_to_shipment).collect()
    }

    /// Case-insensitive prefix search over shipment ids and tracking numbers.
    ///
    /// The query is trimmed, LIKE metacharacters are escaped so user input
    /// can never widen the pattern, and matching is anchored at the start of
    /// either identifier. Results are capped at [`SEARCH_RESULT_CAP`], newest
    /// first. An empty or whitespace-only query yields the empty set without
    /// a store round-trip.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search_by_prefix(&self, query: &str) -> Result<Vec<SearchHit>, RepositoryError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        let pattern = format!("{}%", escape_like_prefix(trimmed));

        let rows = sqlx::query(
            r"
            SELECT shipment_id, tracking_number, status, created_at
            FROM shipment
            WHERE shipment_id ILIKE $1 ESCAPE '\'
               OR tracking_number ILIKE $1 ESCAPE '\'
            ORDER BY created_at DESC
            LIMIT $2
            ",
        )
        .bind(&pattern)
        .bind(SEARCH_RESULT_CAP)
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(row_to_search_hit).collect()
    }

    /// Look up a shipment by its tracking number (the public token).
    ///
    /// Tracking numbers are issued uppercase; the needle is folded before
    /// matching so pasted lowercase input still resolves.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_tracking_number(
        &self,
        tracking_number: &str,
    ) -> Result<Option<Shipment>, RepositoryError> {
        let needle = tracking_number.trim().to_ascii_uppercase();
        if needle.is_empty() {
            return Ok(None);
        }

        let sql = format!(
            r"
            SELECT {SHIPMENT_COLUMNS}
            FROM shipment
            WHERE tracking_number = $1
            "
        );

        let row = sqlx::query(&sql)
            .bind(&needle)
            .fetch_optional(self.pool)
            .await?;

        row.as_ref().map(row_to_shipment).transpose()
    }
}

/// Escape SQL LIKE metacharacters so the input reads as a literal prefix.
fn escape_like_prefix(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn row_to_shipment(row: &PgRow) -> Result<Shipment, RepositoryError> {
    let shipment_id = ShipmentId::parse(&row.try_get::<String, _>("shipment_id")?)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid shipment id: {e}")))?;
    let tracking_number = TrackingNumber::parse(&row.try_get::<String, _>("tracking_number")?)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid tracking number: {e}")))?;
    let created_by_email = row
        .try_get::<Option<String>, _>("created_by_email")?
        .map(|s| {
            Email::parse(&s)
                .map_err(|e| RepositoryError::DataCorruption(format!("invalid owner email: {e}")))
        })
        .transpose()?;

    Ok(Shipment {
        shipment_id,
        tracking_number,
        created_by_user_id: row.try_get("created_by_user_id")?,
        created_by_email,
        origin_country: row.try_get("origin_country")?,
        status: row.try_get("status")?,
        status_note: row.try_get("status_note")?,
        status_updated_at: row.try_get("status_updated_at")?,
        cancelled_at: row.try_get("cancelled_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_search_hit(row: &PgRow) -> Result<SearchHit, RepositoryError> {
    let shipment_id = ShipmentId::parse(&row.try_get::<String, _>("shipment_id")?)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid shipment id: {e}")))?;
    let tracking_number = TrackingNumber::parse(&row.try_get::<String, _>("tracking_number")?)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid tracking number: {e}")))?;

    Ok(SearchHit {
        shipment_id,
        tracking_number,
        status: row.try_get("status")?,
        created_at: row.try_get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_prefix_passthrough() {
        assert_eq!(escape_like_prefix("EXS-2401"), "EXS-2401");
        assert_eq!(escape_like_prefix("ex24us"), "ex24us");
    }

    #[test]
    fn test_escape_like_prefix_escapes_metacharacters() {
        assert_eq!(escape_like_prefix("100%"), r"100\%");
        assert_eq!(escape_like_prefix("a_b"), r"a\_b");
        assert_eq!(escape_like_prefix(r"a\b"), r"a\\b");
        assert_eq!(escape_like_prefix("%_\\"), r"\%\_\\");
    }

    #[test]
    fn test_escaped_prefix_cannot_match_everything() {
        // A bare wildcard query must become a literal, not a match-all.
        let pattern = format!("{}%", escape_like_prefix("%"));
        assert_eq!(pattern, r"\%%");
    }
}
