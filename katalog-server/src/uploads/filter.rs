//! Accepted image types
//!
//! Both the file extension and the declared media type must mention one of
//! jpeg, jpg, png or gif.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

static IMAGE_TYPES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"jpeg|jpg|png|gif").unwrap());

/// Extension of an uploaded file name, without the dot
pub fn extension(file_name: &str) -> Option<&str> {
    Path::new(file_name).extension().and_then(|ext| ext.to_str())
}

/// Check an upload's name and declared media type.
pub fn is_accepted_image(file_name: &str, content_type: &str) -> bool {
    let ext_ok = extension(file_name)
        .map(|ext| IMAGE_TYPES.is_match(&ext.to_ascii_lowercase()))
        .unwrap_or(false);
    ext_ok && IMAGE_TYPES.is_match(content_type)
}
