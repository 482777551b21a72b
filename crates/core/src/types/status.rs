//! Shipment status label.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A shipment status label.
///
/// Statuses are free-text by design - carriers and operators feed in labels
/// like `"created"`, `"In Transit"`, or `"Customs Hold"` and the lifecycle is
/// advisory: any status may follow any other. The one label with special
/// handling is `cancelled`, compared ASCII case-insensitively, which stamps
/// the shipment's `cancelled_at` marker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ShipmentStatus(String);

impl ShipmentStatus {
    /// The normalized label that marks a shipment as cancelled.
    pub const CANCELLED: &'static str = "cancelled";

    /// Default status for newly created shipments.
    #[must_use]
    pub fn created() -> Self {
        Self("created".to_owned())
    }

    /// Parse a status label, trimming surrounding whitespace.
    ///
    /// Returns `None` for an empty or whitespace-only label - the caller
    /// decides whether that is a validation error or "use the default".
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this label normalizes to `cancelled`.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.eq_ignore_ascii_case(Self::CANCELLED)
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShipmentStatus {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for ShipmentStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for ShipmentStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for ShipmentStatus {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims() {
        let status = ShipmentStatus::parse("  In Transit ").unwrap();
        assert_eq!(status.as_str(), "In Transit");
    }

    #[test]
    fn test_parse_empty_is_none() {
        assert!(ShipmentStatus::parse("").is_none());
        assert!(ShipmentStatus::parse("   ").is_none());
    }

    #[test]
    fn test_is_cancelled_case_insensitive() {
        assert!(ShipmentStatus::parse("cancelled").unwrap().is_cancelled());
        assert!(ShipmentStatus::parse("Cancelled").unwrap().is_cancelled());
        assert!(ShipmentStatus::parse("CANCELLED").unwrap().is_cancelled());
    }

    #[test]
    fn test_is_cancelled_rejects_other_labels() {
        assert!(!ShipmentStatus::parse("canceled").unwrap().is_cancelled());
        assert!(!ShipmentStatus::parse("In Transit").unwrap().is_cancelled());
        assert!(!ShipmentStatus::parse("cancellation").unwrap().is_cancelled());
    }

    #[test]
    fn test_free_text_preserved() {
        let status = ShipmentStatus::parse("Customs Hold (Rotterdam)").unwrap();
        assert_eq!(status.to_string(), "Customs Hold (Rotterdam)");
    }

    #[test]
    fn test_serde_transparent() {
        let status = ShipmentStatus::parse("delivered").unwrap();
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, "\"delivered\"");
    }
}
