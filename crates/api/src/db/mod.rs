//! Customer persistence.
//!
//! # Table: `customers`
//!
//! - `id` - `SERIAL` primary key
//! - `first_name`, `last_name`, `username` - text, `username` unique
//! - `dob` - `DATE`
//! - `password` - Argon2id PHC string
//! - `created_at`, `updated_at` - `TIMESTAMPTZ`
//!
//! # Stores
//!
//! - [`PgCustomerStore`] - `PostgreSQL`, uniqueness enforced by a unique index
//! - [`MemoryCustomerStore`] - in-process map for development and tests
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p customer-hub-cli -- migrate
//! ```

pub mod customers;
pub mod memory;

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use customer_hub_core::{Customer, CustomerId, Page, PageRequest, Sort};

pub use customers::PgCustomerStore;
pub use memory::MemoryCustomerStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// The fields written on insert and update.
///
/// Carries a password *hash*; plaintext never reaches a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRecord {
    pub first_name: String,
    pub last_name: String,
    pub dob: NaiveDate,
    pub username: String,
    pub password_hash: String,
}

/// Persistence operations for customers.
///
/// Implementations must reject a write whose username is already held by a
/// different customer with [`RepositoryError::Conflict`], atomically with
/// the write itself.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Insert a new customer and return it with its assigned ID.
    async fn insert(&self, record: &CustomerRecord) -> Result<Customer, RepositoryError>;

    /// Look up a customer by ID.
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError>;

    /// One page of customers in the requested order.
    ///
    /// Ties are broken by ascending ID so pages are stable.
    async fn list(
        &self,
        sort: &[Sort],
        page: PageRequest,
    ) -> Result<Page<Customer>, RepositoryError>;

    /// Replace every field of an existing customer.
    ///
    /// Returns `None` if no customer has this ID.
    async fn update(
        &self,
        id: CustomerId,
        record: &CustomerRecord,
    ) -> Result<Option<Customer>, RepositoryError>;

    /// Remove a customer. Returns `true` if a row was deleted.
    async fn delete(&self, id: CustomerId) -> Result<bool, RepositoryError>;

    /// Whether `username` belongs to a customer other than `except`.
    async fn username_taken(
        &self,
        username: &str,
        except: Option<CustomerId>,
    ) -> Result<bool, RepositoryError>;

    /// Cheap connectivity check for readiness probes.
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
