//! HTTP server command for the katalog product API
//!
//! Runs migrations, then serves the products resource and the upload
//! directory until shutdown.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use katalog_server::{
    create_pool, migrations, run_server, AppState, ImageStore, PgProductStore, ServerConfig,
    UploadConfig,
};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "KATALOG_BIND", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// Directory uploaded images are stored in and served from
    #[arg(long, env = "KATALOG_UPLOADS_DIR", default_value = "uploads")]
    pub uploads_dir: PathBuf,

    /// Restrict CORS to localhost origins (default allows any origin)
    #[arg(long)]
    pub cors_localhost: bool,

    /// Skip creating the product table on startup
    #[arg(long)]
    pub skip_migrations: bool,

    /// Database URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

impl ServeArgs {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind,
            cors_permissive: !self.cors_localhost,
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let database_url = super::database_url(args.database_url.clone())?;

    tracing::info!("Starting katalog server on {}", args.bind);

    // Create database pool
    let pool = create_pool(&database_url)
        .await
        .context("Failed to create database pool")?;

    if !args.skip_migrations {
        migrations::run(&pool)
            .await
            .context("Failed to run migrations")?;
    }

    let uploads = UploadConfig::with_dir(&args.uploads_dir);
    tracing::info!(
        uploads_dir = %uploads.dir.display(),
        max_files = uploads.max_files,
        max_file_bytes = uploads.max_file_bytes,
        "Upload limits"
    );

    let state = AppState::new(
        Arc::new(PgProductStore::new(pool)),
        ImageStore::new(uploads),
    );

    // Run server (blocks until shutdown)
    run_server(state, args.server_config())
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_all_interfaces_on_3000() {
        let args = ServeArgs::parse_from(["serve", "--database-url", "postgres://localhost/katalog"]);
        let config = args.server_config();

        assert_eq!(config.bind_addr.port(), 3000);
        assert!(config.cors_permissive);
        assert_eq!(args.uploads_dir, PathBuf::from("uploads"));
    }

    #[test]
    fn cors_can_be_restricted() {
        let args = ServeArgs::parse_from(["serve", "--cors-localhost", "--bind", "127.0.0.1:8080"]);
        let config = args.server_config();

        assert!(!config.cors_permissive);
        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse().unwrap());
    }
}
