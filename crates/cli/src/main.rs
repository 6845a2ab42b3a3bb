//! Customer Hub CLI - database migrations and seeding.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending migrations
//! ch-cli migrate
//!
//! # Insert 50 random customers
//! ch-cli seed --count 50
//! ```
//!
//! Both commands read `API_DATABASE_URL` (or `DATABASE_URL`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ch-cli")]
#[command(author, version, about = "Customer Hub CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Insert randomly generated customers
    Seed {
        /// Number of customers to create
        #[arg(short, long, default_value_t = 10)]
        count: u32,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { count } => {
            let created = commands::seed::customers(count).await?;
            tracing::info!(created, "Seeding complete");
        }
    }
    Ok(())
}
