//! Command implementations for katalog CLI

pub mod migrate;
pub mod serve;

pub use migrate::run_migrate;
pub use serve::run_serve;

use anyhow::{Context, Result};

/// Resolve the database URL from the flag/env value.
pub(crate) fn database_url(arg: Option<String>) -> Result<String> {
    arg.context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or .env")
}
