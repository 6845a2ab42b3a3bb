//! Customer Hub client.
//!
//! An authenticated HTTP client for `/api/customers` ([`CustomerApi`]), a
//! state container that caches what it fetched ([`CustomerStore`]), and the
//! form validation run before anything is submitted ([`validation`]).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod store;
pub mod validation;

pub use api::{CustomerApi, ListParams};
pub use config::ClientConfig;
pub use error::ClientError;
pub use store::{CustomerListState, CustomerStore, StoreState};
