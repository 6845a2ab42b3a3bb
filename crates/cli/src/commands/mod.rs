//! Subcommand implementations.

pub mod migrate;
pub mod seed;

use sqlx::PgPool;

use customer_hub_api::config::{ConfigError, get_database_url};
use customer_hub_api::db;

/// Load `.env`, then connect to the customer database.
async fn connect() -> Result<PgPool, ConnectError> {
    dotenvy::dotenv().ok();

    let database_url = get_database_url("API_DATABASE_URL")?;

    tracing::info!("Connecting to customer database...");
    Ok(db::create_pool(&database_url).await?)
}

/// Failure to reach the database.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
