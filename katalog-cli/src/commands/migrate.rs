//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;

use katalog_server::{create_pool, migrations};

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

/// Create the product table if it does not exist
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let database_url = super::database_url(args.database_url)?;

    let pool = create_pool(&database_url)
        .await
        .context("Failed to create database pool")?;

    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(())
}
