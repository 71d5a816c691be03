//! Static file serving for /uploads/
//!
//! Stored product images are served verbatim from the upload directory.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use tower_http::services::ServeDir;

use crate::http::server::AppState;
use crate::uploads::PUBLIC_PREFIX;

/// Create router for static file serving from the upload directory
pub fn router(dir: &Path) -> Router<Arc<AppState>> {
    tracing::info!(path = %dir.display(), "Serving uploads from {}/", PUBLIC_PREFIX);
    Router::new().nest_service(PUBLIC_PREFIX, ServeDir::new(dir))
}
