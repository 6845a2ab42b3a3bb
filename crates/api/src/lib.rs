//! Customer Hub API library.
//!
//! The REST server as a library, so the binary, the CLI and the integration
//! tests share one router and one set of stores.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::app;
pub use state::AppState;
