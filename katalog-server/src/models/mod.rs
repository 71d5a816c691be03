//! Domain models for the product catalog
//!
//! Form text is collected by the upload layer and coerced into write
//! payloads by the handlers. Coercion failures return ValidationError.

pub mod image_list;
pub mod product;
pub mod validation;

pub use image_list::{ImageList, ImageListError};
pub use product::{NewProduct, Product, ProductFields, ProductUpdate};
pub use validation::ValidationError;
