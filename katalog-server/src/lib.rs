//! katalog-server: product catalog HTTP API
//!
//! CRUD over the `urunler` table plus the lifecycle of the images uploaded
//! with each product: validated before the handler runs, written to the
//! upload directory, and reclaimed best-effort once nothing references them.

pub mod db;
pub mod http;
pub mod models;
pub mod uploads;

pub use db::{create_pool, migrations, MemoryStore, PgProductStore, ProductStore};
pub use http::{build_router, run_server, ApiError, AppState, ServerConfig, ServerError};
pub use models::{ImageList, Product};
pub use uploads::{ImageStore, UploadConfig};
