//! Upload configuration
//!
//! Passed into [`super::ImageStore`] at startup; nothing reads it from
//! global state.

use std::path::PathBuf;

/// Default per-file ceiling (5 MiB)
pub const DEFAULT_MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

/// Default number of images per request
pub const DEFAULT_MAX_FILES: usize = 5;

/// Headroom for text fields and multipart framing
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Upload directory and limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    /// Directory image files are written to (served at `/uploads`)
    pub dir: PathBuf,
    pub max_files: usize,
    pub max_file_bytes: usize,
}

impl UploadConfig {
    /// Default limits with an explicit directory
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    /// Largest request body the limits can produce
    pub fn request_body_limit(&self) -> usize {
        self.max_files * self.max_file_bytes + FORM_OVERHEAD_BYTES
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
            max_files: DEFAULT_MAX_FILES,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}
