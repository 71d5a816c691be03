//! API error types with IntoResponse
//!
//! Every error becomes `{"error": <message>, "status": <code>}`. Driver and
//! filesystem detail is logged, never sent to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::repos::DbError;
use crate::models::ValidationError;
use crate::uploads::UploadError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Path value has the wrong shape (400)
    Validation(ValidationError),

    /// Upload rejected by type, size or count rules (400)
    Upload(UploadError),

    /// Product absent on a read (404)
    NotFound { id: i32 },

    /// Product absent on an update or delete (400)
    UnknownTarget { id: i32 },

    /// Stored image list failed to decode (500, logged)
    CorruptImages(DbError),

    /// Any other store failure (500, logged); `context` is the client message
    Database {
        context: &'static str,
        source: DbError,
    },

    /// Internal error (500, logged)
    Internal { message: String },
}

const PRODUCT_NOT_FOUND: &str = "product not found";

impl ApiError {
    /// Map a store error from a read; absent rows become 404.
    pub fn read(context: &'static str) -> impl FnOnce(DbError) -> Self {
        move |err| match err {
            DbError::NotFound { id } => Self::NotFound { id },
            err => Self::store(context, err),
        }
    }

    /// Map a store error from a write; absent rows become 400.
    pub fn write(context: &'static str) -> impl FnOnce(DbError) -> Self {
        move |err| match err {
            DbError::NotFound { id } => Self::UnknownTarget { id },
            err => Self::store(context, err),
        }
    }

    fn store(context: &'static str, err: DbError) -> Self {
        match err {
            err @ DbError::Images { .. } => Self::CorruptImages(err),
            source => Self::Database { context, source },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Upload(_) | Self::UnknownTarget { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::CorruptImages(_) | Self::Database { .. } | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::Validation(e) => e.to_string(),
            Self::Upload(e) => e.to_string(),
            Self::NotFound { id } | Self::UnknownTarget { id } => {
                tracing::debug!(id, "Product not found");
                PRODUCT_NOT_FOUND.to_string()
            }
            Self::CorruptImages(e) => {
                tracing::error!("Image list error: {}", e);
                "failed to parse product images".to_string()
            }
            Self::Database { context, source } => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", source);
                context.to_string()
            }
            Self::Internal { message } => {
                tracing::error!("Internal error: {}", message);
                "an internal error occurred".to_string()
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<UploadError> for ApiError {
    fn from(e: UploadError) -> Self {
        Self::Upload(e)
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        Self::Internal {
            message: format!("image storage failed: {}", e),
        }
    }
}
