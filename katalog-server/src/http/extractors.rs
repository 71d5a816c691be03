//! Custom Axum extractors
//!
//! `ProductForm` is the upload layer: it reads the multipart body, enforces
//! the file rules and collects the text fields as sent. Nothing is written
//! to disk here.

use axum::extract::{FromRef, FromRequest, FromRequestParts, Multipart, Path, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use super::error::ApiError;
use crate::models::{ProductFields, ValidationError};
use crate::uploads::{is_accepted_image, PendingImage, UploadConfig, UploadError};

/// Multipart field carrying product images
pub const IMAGE_FIELD: &str = "gorsel";

/// Extract and validate an integer product id from path
pub struct ProductId(pub i32);

impl<S> FromRequestParts<S> for ProductId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| {
                ApiError::Validation(ValidationError::InvalidFormat {
                    field: "id",
                    reason: "missing",
                })
            })?;

        let id = id.parse::<i32>().map_err(|_| {
            ApiError::Validation(ValidationError::InvalidFormat {
                field: "id",
                reason: "expected an integer",
            })
        })?;

        Ok(Self(id))
    }
}

/// Validated product form: raw text fields plus accepted images
#[derive(Debug, Default)]
pub struct ProductForm {
    pub fields: ProductFields,
    pub images: Vec<PendingImage>,
}

impl<S> FromRequest<S> for ProductForm
where
    UploadConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // A bodiless PATCH or DELETE is an empty form
        if !is_multipart(req.headers()) {
            return Ok(Self::default());
        }

        let limits = UploadConfig::from_ref(state);
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| UploadError::Malformed(e.body_text()))?;

        let mut form = Self::default();
        while let Some(mut field) = multipart.next_field().await.map_err(UploadError::from)? {
            let name = field.name().unwrap_or_default().to_owned();

            let Some(file_name) = field.file_name().map(str::to_owned) else {
                if ProductFields::NAMES.contains(&name.as_str()) {
                    let value = field.text().await.map_err(UploadError::from)?;
                    form.fields.set(&name, &value);
                }
                continue;
            };

            if name != IMAGE_FIELD {
                return Err(UploadError::UnexpectedField(name).into());
            }
            if form.images.len() >= limits.max_files {
                return Err(UploadError::TooManyFiles {
                    max: limits.max_files,
                }
                .into());
            }

            let content_type = field.content_type().unwrap_or_default().to_owned();
            if !is_accepted_image(&file_name, &content_type) {
                return Err(UploadError::UnsupportedType { name: file_name }.into());
            }

            let mut data = Vec::new();
            while let Some(chunk) = field.chunk().await.map_err(UploadError::from)? {
                if data.len() + chunk.len() > limits.max_file_bytes {
                    return Err(UploadError::FileTooLarge {
                        name: file_name,
                        max_bytes: limits.max_file_bytes,
                    }
                    .into());
                }
                data.extend_from_slice(&chunk);
            }

            form.images.push(PendingImage {
                file_name,
                content_type,
                data,
            });
        }

        tracing::debug!(images = form.images.len(), "Accepted product form");
        Ok(form)
    }
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false)
}
