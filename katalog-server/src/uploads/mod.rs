//! Image upload layer
//!
//! - `config`: upload directory and limits
//! - `filter`: accepted file types
//! - `store`: writing accepted files and reclaiming them later

pub mod config;
pub mod filter;
pub mod store;

pub use config::UploadConfig;
pub use filter::is_accepted_image;
pub use store::{ImageStore, PendingImage, ReclaimReport, PUBLIC_PREFIX};

/// Upload rejected before any handler logic runs
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("at most {max} images may be attached")]
    TooManyFiles { max: usize },

    #[error("image '{name}' exceeds the {max_bytes} byte limit")]
    FileTooLarge { name: String, max_bytes: usize },

    #[error("only JPEG, PNG, JPG and GIF images are accepted ('{name}' rejected)")]
    UnsupportedType { name: String },

    #[error("unexpected file field '{0}'")]
    UnexpectedField(String),

    #[error("malformed upload: {0}")]
    Malformed(String),
}

impl From<axum::extract::multipart::MultipartError> for UploadError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        Self::Malformed(err.body_text())
    }
}
