//! Product records and the write payloads derived from form input

use serde::Serialize;

use super::{ImageList, ValidationError};

/// Product record as returned by reads
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: i32,
    pub isim: String,
    pub aciklama: Option<String>,
    pub fiyat: Option<f64>,
    pub miktar: Option<i32>,
    pub gorsel: ImageList,
}

/// Text fields submitted with a create or update form, as sent.
///
/// Numeric fields are coerced only when a write payload is built, so a bad
/// value fails at the store boundary rather than in the upload layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFields {
    pub isim: Option<String>,
    pub aciklama: Option<String>,
    pub fiyat: Option<String>,
    pub miktar: Option<String>,
}

/// Row payload for an insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub isim: Option<String>,
    pub aciklama: Option<String>,
    pub fiyat: Option<f64>,
    pub miktar: Option<i32>,
    pub gorsel: ImageList,
}

/// Full row payload for an update, after merging with the current row
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub isim: String,
    pub aciklama: Option<String>,
    pub fiyat: Option<f64>,
    pub miktar: Option<i32>,
    pub gorsel: ImageList,
}

impl ProductFields {
    /// Names of the text fields accepted in a product form
    pub const NAMES: [&'static str; 4] = ["isim", "aciklama", "fiyat", "miktar"];

    /// Record one form value. Unknown names are ignored.
    pub fn set(&mut self, name: &str, value: &str) {
        let slot = match name {
            "isim" => &mut self.isim,
            "aciklama" => &mut self.aciklama,
            "fiyat" => &mut self.fiyat,
            "miktar" => &mut self.miktar,
            _ => return,
        };
        *slot = Some(value.to_owned());
    }

    /// Build an insert payload.
    ///
    /// Text fields pass through as given, empty strings included. An empty
    /// numeric field is stored as NULL; anything else must coerce.
    pub fn into_new(self, gorsel: ImageList) -> Result<NewProduct, ValidationError> {
        Ok(NewProduct {
            fiyat: price(self.fiyat.as_deref())?,
            miktar: quantity(self.miktar.as_deref())?,
            isim: self.isim,
            aciklama: self.aciklama,
            gorsel,
        })
    }

    /// Overlay the submitted fields on the current row.
    ///
    /// Absent or empty fields keep their current value. `replacement`
    /// replaces the whole image list; `None` keeps the current list.
    pub fn merge(
        self,
        current: &Product,
        replacement: Option<ImageList>,
    ) -> Result<ProductUpdate, ValidationError> {
        Ok(ProductUpdate {
            isim: non_empty(self.isim).unwrap_or_else(|| current.isim.clone()),
            aciklama: non_empty(self.aciklama).or_else(|| current.aciklama.clone()),
            fiyat: price(self.fiyat.as_deref())?.or(current.fiyat),
            miktar: quantity(self.miktar.as_deref())?.or(current.miktar),
            gorsel: replacement.unwrap_or_else(|| current.gorsel.clone()),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn price(value: Option<&str>) -> Result<Option<f64>, ValidationError> {
    numeric(value, "fiyat", |v| v.parse::<f64>().ok().filter(|p| p.is_finite()))
}

fn quantity(value: Option<&str>) -> Result<Option<i32>, ValidationError> {
    numeric(value, "miktar", |v| v.parse::<i32>().ok())
}

fn numeric<T>(
    value: Option<&str>,
    field: &'static str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<Option<T>, ValidationError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    parse(trimmed)
        .map(Some)
        .ok_or_else(|| ValidationError::NotANumber {
            field,
            value: raw.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chair() -> Product {
        Product {
            id: 7,
            isim: "Chair".into(),
            aciklama: Some("Oak".into()),
            fiyat: Some(49.99),
            miktar: Some(3),
            gorsel: ImageList::new(vec!["/uploads/1.png".into()]),
        }
    }

    fn fields(pairs: &[(&str, &str)]) -> ProductFields {
        let mut fields = ProductFields::default();
        for (name, value) in pairs {
            fields.set(name, value);
        }
        fields
    }

    #[test]
    fn coerces_numeric_fields() {
        let product = fields(&[("fiyat", " 59.99 "), ("miktar", "12")])
            .into_new(ImageList::default())
            .unwrap();
        assert_eq!(product.fiyat, Some(59.99));
        assert_eq!(product.miktar, Some(12));
    }

    #[test]
    fn rejects_non_numeric_values() {
        assert!(matches!(
            fields(&[("fiyat", "cheap")]).into_new(ImageList::default()),
            Err(ValidationError::NotANumber { field: "fiyat", .. })
        ));
        assert!(fields(&[("fiyat", "NaN")]).into_new(ImageList::default()).is_err());
        assert!(fields(&[("miktar", "2.5")]).into_new(ImageList::default()).is_err());
        assert!(fields(&[("miktar", "many")]).merge(&chair(), None).is_err());
    }

    #[test]
    fn create_keeps_empty_text_as_given() {
        let product = fields(&[("isim", ""), ("aciklama", ""), ("fiyat", ""), ("miktar", " ")])
            .into_new(ImageList::default())
            .unwrap();
        assert_eq!(product.isim.as_deref(), Some(""));
        assert_eq!(product.aciklama.as_deref(), Some(""));
        assert_eq!(product.fiyat, None);
        assert_eq!(product.miktar, None);
    }

    #[test]
    fn set_ignores_unknown_fields() {
        assert_eq!(fields(&[("renk", "red")]), ProductFields::default());
    }

    #[test]
    fn merge_keeps_current_values_for_absent_fields() {
        let update = fields(&[("fiyat", "59.99")]).merge(&chair(), None).unwrap();

        assert_eq!(update.isim, "Chair");
        assert_eq!(update.aciklama.as_deref(), Some("Oak"));
        assert_eq!(update.fiyat, Some(59.99));
        assert_eq!(update.miktar, Some(3));
        assert_eq!(update.gorsel, chair().gorsel);
    }

    #[test]
    fn merge_treats_empty_values_as_absent() {
        let update = fields(&[("isim", ""), ("aciklama", ""), ("fiyat", ""), ("miktar", "")])
            .merge(&chair(), None)
            .unwrap();
        assert_eq!(update.isim, "Chair");
        assert_eq!(update.aciklama.as_deref(), Some("Oak"));
        assert_eq!(update.fiyat, Some(49.99));
        assert_eq!(update.miktar, Some(3));
    }

    #[test]
    fn merge_replaces_images_wholesale() {
        let replacement = ImageList::new(vec!["/uploads/2.gif".into(), "/uploads/3.jpg".into()]);
        let update = ProductFields::default()
            .merge(&chair(), Some(replacement.clone()))
            .unwrap();
        assert_eq!(update.gorsel, replacement);
    }

    #[test]
    fn serializes_with_catalog_field_names() {
        let value = serde_json::to_value(chair()).unwrap();
        assert_eq!(value["isim"], "Chair");
        assert_eq!(value["fiyat"], 49.99);
        assert_eq!(value["gorsel"], serde_json::json!(["/uploads/1.png"]));
    }
}
