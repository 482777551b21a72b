//! Exship Core - Shared types library.
//!
//! This crate provides common types used across all Exship components:
//! - `server` - Shipment tracking API service
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, roles, statuses,
//!   and the shipment/tracking identifier generator

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
