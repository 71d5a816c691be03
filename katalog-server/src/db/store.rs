//! Product store trait and the PostgreSQL implementation
//!
//! Handlers depend on the trait so the HTTP layer can be exercised against
//! [`crate::db::MemoryStore`] without a database.

use async_trait::async_trait;
use sqlx::PgPool;

use super::repos::{DbError, ProductRepo};
use crate::models::{NewProduct, Product, ProductUpdate};

/// CRUD access to the product table (testable)
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, DbError>;

    async fn get(&self, id: i32) -> Result<Product, DbError>;

    /// Insert a row and return its generated id
    async fn create(&self, product: NewProduct) -> Result<i32, DbError>;

    async fn update(&self, id: i32, update: ProductUpdate) -> Result<(), DbError>;

    async fn delete(&self, id: i32) -> Result<(), DbError>;

    async fn ping(&self) -> Result<(), DbError>;
}

/// Store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn repo(&self) -> ProductRepo<'_> {
        ProductRepo::new(&self.pool)
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn list(&self) -> Result<Vec<Product>, DbError> {
        self.repo().list().await
    }

    async fn get(&self, id: i32) -> Result<Product, DbError> {
        self.repo().get(id).await
    }

    async fn create(&self, product: NewProduct) -> Result<i32, DbError> {
        self.repo().create(&product).await
    }

    async fn update(&self, id: i32, update: ProductUpdate) -> Result<(), DbError> {
        self.repo().update(id, &update).await
    }

    async fn delete(&self, id: i32) -> Result<(), DbError> {
        self.repo().delete(id).await
    }

    async fn ping(&self) -> Result<(), DbError> {
        self.repo().ping().await
    }
}
