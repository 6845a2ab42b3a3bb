//! Customer Hub Core - Shared types library.
//!
//! This crate provides the types used across all Customer Hub components:
//! - `api` - The customer REST API server
//! - `client` - HTTP client and client-side state store
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure functions - no I/O,
//! no database access, no HTTP clients. The server-authoritative validation
//! rules live here so they can be exercised without a running server.
//!
//! # Modules
//!
//! - [`types`] - Customer IDs, wire types, envelopes, pagination and sorting
//! - [`validation`] - Field-level validation of customer payloads

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod validation;

pub use types::*;
pub use validation::{ValidationErrors, validate_customer};
