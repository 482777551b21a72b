//! Generated shipment and tracking identifiers.
//!
//! Both identifier kinds are issued once at shipment creation and never
//! change. The tracking number doubles as an unguessable lookup token for the
//! public tracking page, so the random segments come from a cryptographically
//! secure generator (`rand::rng()`, ChaCha-based), not a predictable PRNG.
//!
//! Uniqueness is NOT guaranteed by construction - the store enforces a unique
//! constraint on both columns and the inserting caller retries on conflict.

use core::fmt;

use chrono::{DateTime, Datelike, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a generated identifier.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// Tracking number does not match `EX<yy><CC><7 digits><letter>`.
    #[error("malformed tracking number")]
    MalformedTrackingNumber,
    /// Shipment id does not match `EXS-<yymmdd>-<6 hex>`.
    #[error("malformed shipment id")]
    MalformedShipmentId,
}

/// A tracking number: `EX` + 2-digit year + 2-letter country + 7-digit random
/// decimal + 1 random uppercase letter. Always 14 characters.
///
/// ```
/// use exship_core::TrackingNumber;
///
/// let tn = TrackingNumber::generate(Some("us"));
/// assert_eq!(tn.as_str().len(), 14);
/// assert!(tn.as_str().starts_with("EX"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TrackingNumber(String);

impl TrackingNumber {
    /// Exact length of every tracking number.
    pub const LENGTH: usize = 14;

    /// Generate a fresh tracking number for the given origin country code.
    #[must_use]
    pub fn generate(origin_country: Option<&str>) -> Self {
        Self::generate_at(origin_country, Utc::now())
    }

    /// Generate a tracking number stamped with the given instant's year.
    #[must_use]
    pub fn generate_at(origin_country: Option<&str>, now: DateTime<Utc>) -> Self {
        let mut rng = rand::rng();
        let serial: u32 = rng.random_range(0..10_000_000);
        let letter = char::from(b'A' + rng.random_range(0..26u8));

        Self(format!(
            "EX{:02}{}{serial:07}{letter}",
            now.year() % 100,
            normalize_country(origin_country),
        ))
    }

    /// Parse a tracking number, validating the fixed format.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::MalformedTrackingNumber`] if the input does
    /// not match `EX<2 digits><2 uppercase letters><7 digits><uppercase letter>`.
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let s = raw.trim();
        let bytes = s.as_bytes();
        let well_formed = s.len() == Self::LENGTH
            && s.starts_with("EX")
            && bytes.get(2..4).is_some_and(all_ascii_digits)
            && bytes.get(4..6).is_some_and(all_ascii_uppercase)
            && bytes.get(6..13).is_some_and(all_ascii_digits)
            && bytes.get(13).is_some_and(u8::is_ascii_uppercase);

        if well_formed {
            Ok(Self(s.to_owned()))
        } else {
            Err(IdentifierError::MalformedTrackingNumber)
        }
    }

    /// Returns the tracking number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `TrackingNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A shipment id: `EXS-` + `YYMMDD` + `-` + 6 uppercase hex characters from
/// 3 random bytes. Always 17 characters.
///
/// ```
/// use exship_core::ShipmentId;
///
/// let id = ShipmentId::generate();
/// assert!(id.as_str().starts_with("EXS-"));
/// assert_eq!(id.as_str().len(), 17);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ShipmentId(String);

impl ShipmentId {
    /// Exact length of every shipment id.
    pub const LENGTH: usize = 17;

    /// Generate a fresh shipment id stamped with today's date.
    #[must_use]
    pub fn generate() -> Self {
        Self::generate_at(Utc::now())
    }

    /// Generate a shipment id stamped with the given instant's date.
    #[must_use]
    pub fn generate_at(now: DateTime<Utc>) -> Self {
        let suffix: [u8; 3] = rand::rng().random();

        Self(format!(
            "EXS-{:02}{:02}{:02}-{:02X}{:02X}{:02X}",
            now.year() % 100,
            now.month(),
            now.day(),
            suffix[0],
            suffix[1],
            suffix[2],
        ))
    }

    /// Parse a shipment id, validating the fixed format.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::MalformedShipmentId`] if the input does not
    /// match `EXS-<6 digits>-<6 uppercase hex>`.
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let s = raw.trim();
        let bytes = s.as_bytes();
        let well_formed = s.len() == Self::LENGTH
            && s.starts_with("EXS-")
            && bytes.get(4..10).is_some_and(all_ascii_digits)
            && bytes.get(10) == Some(&b'-')
            && bytes.get(11..17).is_some_and(all_upper_hex);

        if well_formed {
            Ok(Self(s.to_owned()))
        } else {
            Err(IdentifierError::MalformedShipmentId)
        }
    }

    /// Returns the shipment id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ShipmentId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ShipmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize an origin country code to exactly two uppercase letters.
///
/// Non-alphabetic characters are discarded, the remainder is uppercased and
/// truncated or padded with `X` to two characters; absent or fully invalid
/// input becomes `XX`.
fn normalize_country(raw: Option<&str>) -> String {
    let mut code: String = raw
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .take(2)
        .collect();

    while code.len() < 2 {
        code.push('X');
    }
    code
}

fn all_ascii_digits(bytes: &[u8]) -> bool {
    !bytes.is_empty() && bytes.iter().all(u8::is_ascii_digit)
}

fn all_ascii_uppercase(bytes: &[u8]) -> bool {
    !bytes.is_empty() && bytes.iter().all(u8::is_ascii_uppercase)
}

fn all_upper_hex(bytes: &[u8]) -> bool {
    !bytes.is_empty()
        && bytes
            .iter()
            .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(b))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_tracking_number_format() {
        for _ in 0..100 {
            let tn = TrackingNumber::generate(Some("US"));
            assert_eq!(tn.as_str().len(), TrackingNumber::LENGTH);
            assert!(TrackingNumber::parse(tn.as_str()).is_ok(), "{tn}");
            assert!(tn.as_str().contains("US"));
        }
    }

    #[test]
    fn test_tracking_number_year_segment() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let tn = TrackingNumber::generate_at(Some("DE"), now);
        assert!(tn.as_str().starts_with("EX24DE"));
    }

    #[test]
    fn test_tracking_number_serial_range() {
        for _ in 0..200 {
            let tn = TrackingNumber::generate(None);
            let serial: u32 = tn.as_str()[6..13].parse().unwrap();
            assert!(serial < 10_000_000);
        }
    }

    #[test]
    fn test_country_normalization() {
        assert_eq!(normalize_country(Some("us")), "US");
        assert_eq!(normalize_country(Some("USA")), "US");
        assert_eq!(normalize_country(Some("u")), "UX");
        assert_eq!(normalize_country(Some("12")), "XX");
        assert_eq!(normalize_country(Some("")), "XX");
        assert_eq!(normalize_country(None), "XX");
        assert_eq!(normalize_country(Some(" f r ")), "FR");
    }

    #[test]
    fn test_tracking_number_parse_rejects_malformed() {
        assert!(TrackingNumber::parse("").is_err());
        assert!(TrackingNumber::parse("EX24US123456A").is_err()); // 6-digit serial
        assert!(TrackingNumber::parse("EX24us1234567A").is_err()); // lowercase country
        assert!(TrackingNumber::parse("XX24US1234567A").is_err()); // wrong prefix
        assert!(TrackingNumber::parse("EX24US12345678").is_err()); // digit suffix
    }

    #[test]
    fn test_shipment_id_format() {
        for _ in 0..100 {
            let id = ShipmentId::generate();
            assert_eq!(id.as_str().len(), ShipmentId::LENGTH);
            assert!(ShipmentId::parse(id.as_str()).is_ok(), "{id}");
        }
    }

    #[test]
    fn test_shipment_id_date_segment() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let id = ShipmentId::generate_at(now);
        assert!(id.as_str().starts_with("EXS-240101-"));
    }

    #[test]
    fn test_shipment_id_parse_examples() {
        assert!(ShipmentId::parse("EXS-240101-ABCDEF").is_ok());
        assert!(ShipmentId::parse("EXS-240101-012345").is_ok());
        assert!(ShipmentId::parse("EXS-240101-abcdef").is_err()); // lowercase hex
        assert!(ShipmentId::parse("EXS-240101-GHIJKL").is_err()); // not hex
        assert!(ShipmentId::parse("EXS-2401010ABCDEF").is_err()); // missing dash
        assert!(ShipmentId::parse("EX-240101-ABCDEF").is_err()); // wrong prefix
    }

    #[test]
    fn test_generated_identifiers_vary() {
        // Two draws colliding across both random segments is as good as
        // impossible; a repeated value here means the RNG is not being used.
        let a = TrackingNumber::generate(Some("GB"));
        let b = TrackingNumber::generate(Some("GB"));
        let c = ShipmentId::generate();
        let d = ShipmentId::generate();
        assert!(a != b || c != d);
    }
}
