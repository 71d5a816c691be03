//! Product image list, stored as a JSON text column
//!
//! The `gorsel` column holds a JSON array of public paths such as
//! `/uploads/1718000000000.png`. A value that does not parse as an array of
//! strings is a data-integrity error and is never silently replaced.

use serde::{Deserialize, Serialize};

/// Error decoding or encoding a stored image list
#[derive(Debug, thiserror::Error)]
pub enum ImageListError {
    #[error("stored image list is not a JSON array of strings: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("failed to encode image list: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Ordered list of public image paths belonging to one product
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageList(Vec<String>);

impl ImageList {
    pub fn new(paths: Vec<String>) -> Self {
        Self(paths)
    }

    /// Decode the stored column value.
    ///
    /// JSON `null` decodes to an empty list; anything that is not an array of
    /// strings is rejected.
    pub fn parse(raw: &str) -> Result<Self, ImageListError> {
        let paths: Option<Vec<String>> =
            serde_json::from_str(raw).map_err(ImageListError::Malformed)?;
        Ok(Self(paths.unwrap_or_default()))
    }

    /// Encode for storage in the `gorsel` column
    pub fn to_json(&self) -> Result<String, ImageListError> {
        serde_json::to_string(&self.0).map_err(ImageListError::Encode)
    }

    pub fn paths(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for ImageList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stored_array() {
        let list = ImageList::parse(r#"["/uploads/1.png","/uploads/2.gif"]"#).unwrap();
        assert_eq!(list.paths(), ["/uploads/1.png", "/uploads/2.gif"]);
    }

    #[test]
    fn null_is_empty() {
        assert!(ImageList::parse("null").unwrap().is_empty());
        assert!(ImageList::parse("[]").unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_values() {
        for raw in ["", "not json", "{\"a\":1}", "[1,2]", "\"/uploads/1.png\""] {
            let err = ImageList::parse(raw).unwrap_err();
            assert!(matches!(err, ImageListError::Malformed(_)), "accepted {:?}", raw);
        }
    }

    #[test]
    fn encodes_as_json_array() {
        let list = ImageList::new(vec!["/uploads/1.jpg".into()]);
        assert_eq!(list.to_json().unwrap(), r#"["/uploads/1.jpg"]"#);
        assert_eq!(ImageList::default().to_json().unwrap(), "[]");
    }

    #[test]
    fn serializes_transparently() {
        let list = ImageList::new(vec!["/uploads/1.jpg".into()]);
        let value = serde_json::to_value(&list).unwrap();
        assert_eq!(value, serde_json::json!(["/uploads/1.jpg"]));
    }
}
