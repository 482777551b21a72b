//! Domain models for the shipment tracking service.
//!
//! These are validated domain objects hydrated from repository rows. None of
//! them carry the internal storage row id - projections never select it, so
//! it cannot leak into API output.

pub mod notification;
pub mod shipment;
pub mod user;

pub use notification::Notification;
pub use shipment::{SearchHit, Shipment, TrackingEvent};
pub use user::{DeletedUser, User};
