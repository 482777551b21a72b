//! Core types for Exship.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod identifiers;
pub mod role;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use identifiers::{IdentifierError, ShipmentId, TrackingNumber};
pub use role::Role;
pub use status::ShipmentStatus;
