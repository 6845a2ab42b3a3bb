//! Database migration command.
//!
//! Applies `crates/api/migrations/` in order; already-applied migrations are
//! skipped.

use super::{ConnectError, connect};

/// Errors that can occur while migrating.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run the customer database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let pool = connect().await?;

    tracing::info!("Running customer migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Customer migrations complete!");
    Ok(())
}
