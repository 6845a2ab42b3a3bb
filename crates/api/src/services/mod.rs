//! Business logic services.
//!
//! Services sit between route handlers and the customer store: they validate
//! input, hash passwords and translate storage outcomes into domain errors.

pub mod customers;
pub mod password;

pub use customers::{CustomerError, CustomerService};
pub use password::{PasswordError, hash_password, verify_password};
