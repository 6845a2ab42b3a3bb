//! HTTP middleware stack for the customer API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Basic auth (customer routes only)

pub mod basic_auth;
pub mod request_id;

pub use basic_auth::basic_auth_middleware;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
