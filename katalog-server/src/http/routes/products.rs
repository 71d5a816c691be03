//! Product endpoints
//!
//! Writes follow one pattern: validate uploads (extractor), look up the
//! current row where needed, persist new images, coerce and run the query,
//! then reclaim whichever set of files is no longer referenced.
//! Reclamation is never awaited.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::db::DbError;
use crate::http::error::ApiError;
use crate::http::extractors::{ProductForm, ProductId};
use crate::http::server::AppState;
use crate::models::Product;

/// Mount point of the products resource
pub const PRODUCTS_PATH: &str = "/api/urunler";

const LIST_FAILED: &str = "failed to fetch products";
const CREATE_FAILED: &str = "product could not be saved";
const UPDATE_FAILED: &str = "product could not be updated";
const DELETE_FAILED: &str = "product could not be deleted";

/// Create response
#[derive(Serialize)]
pub struct CreatedResponse {
    pub id: i32,
}

/// Confirmation for updates and deletes
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// GET /api/urunler - all products in storage order
async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.store.list().await.map_err(ApiError::read(LIST_FAILED))?;
    Ok(Json(products))
}

/// GET /api/urunler/{id}
async fn get_product(
    State(state): State<Arc<AppState>>,
    ProductId(id): ProductId,
) -> Result<Json<Product>, ApiError> {
    let product = state.store.get(id).await.map_err(ApiError::read(LIST_FAILED))?;
    Ok(Json(product))
}

/// POST /api/urunler - create a product with up to five images
async fn create_product(
    State(state): State<Arc<AppState>>,
    form: ProductForm,
) -> Result<Json<CreatedResponse>, ApiError> {
    let ProductForm { fields, images } = form;
    let gorsel = state.images.persist(images).await?;

    // A value the column cannot hold fails like any other rejected insert
    let created = match fields.into_new(gorsel.clone()) {
        Ok(product) => state.store.create(product).await,
        Err(invalid) => Err(DbError::from(invalid)),
    };

    match created {
        Ok(id) => {
            tracing::info!(id, images = gorsel.len(), "Product created");
            Ok(Json(CreatedResponse { id }))
        }
        Err(err) => {
            // The row was never written, so neither should its files be kept
            drop(state.images.reclaim(gorsel));
            Err(ApiError::write(CREATE_FAILED)(err))
        }
    }
}

/// PATCH /api/urunler/{id} - partial update; new images replace the old set
async fn update_product(
    State(state): State<Arc<AppState>>,
    ProductId(id): ProductId,
    form: ProductForm,
) -> Result<Json<MessageResponse>, ApiError> {
    let current = state
        .store
        .get(id)
        .await
        .map_err(ApiError::write(UPDATE_FAILED))?;

    let ProductForm { fields, images } = form;
    let replacement = if images.is_empty() {
        None
    } else {
        Some(state.images.persist(images).await?)
    };

    let updated = match fields.merge(&current, replacement.clone()) {
        Ok(update) => state.store.update(id, update).await,
        Err(invalid) => Err(DbError::from(invalid)),
    };

    match updated {
        Ok(()) => {
            if replacement.is_some() {
                drop(state.images.reclaim(current.gorsel));
            }
            tracing::info!(id, replaced_images = replacement.is_some(), "Product updated");
            Ok(Json(MessageResponse {
                message: "product updated",
            }))
        }
        Err(err) => {
            if let Some(written) = replacement {
                drop(state.images.reclaim(written));
            }
            Err(ApiError::write(UPDATE_FAILED)(err))
        }
    }
}

/// DELETE /api/urunler/{id} - remove the row, then its images
async fn delete_product(
    State(state): State<Arc<AppState>>,
    ProductId(id): ProductId,
    form: ProductForm,
) -> Result<Json<MessageResponse>, ApiError> {
    if !form.images.is_empty() {
        tracing::debug!(id, images = form.images.len(), "Ignoring images attached to delete");
    }

    let current = state
        .store
        .get(id)
        .await
        .map_err(ApiError::write(DELETE_FAILED))?;

    state
        .store
        .delete(id)
        .await
        .map_err(ApiError::write(DELETE_FAILED))?;

    tracing::info!(id, images = current.gorsel.len(), "Product deleted");
    drop(state.images.reclaim(current.gorsel));

    Ok(Json(MessageResponse {
        message: "product and images deleted",
    }))
}

/// Product routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(PRODUCTS_PATH, get(list_products).post(create_product))
        .route(
            &format!("{}/{{id}}", PRODUCTS_PATH),
            get(get_product).patch(update_product).delete(delete_product),
        )
}
