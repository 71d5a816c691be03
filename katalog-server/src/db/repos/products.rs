//! Product repository
//!
//! CRUD over the `urunler` table. The image list is stored as JSON text and
//! decoded when rows are converted into [`Product`] records.

use sqlx::{FromRow, PgPool};

use crate::models::{
    ImageList, ImageListError, NewProduct, Product, ProductUpdate, ValidationError,
};

/// Product row as stored
#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub id: i32,
    pub isim: String,
    pub aciklama: Option<String>,
    pub fiyat: Option<f64>,
    pub miktar: Option<i32>,
    pub gorsel: String,
}

impl TryFrom<ProductRow> for Product {
    type Error = ImageListError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Product {
            gorsel: ImageList::parse(&row.gorsel)?,
            id: row.id,
            isim: row.isim,
            aciklama: row.aciklama,
            fiyat: row.fiyat,
            miktar: row.miktar,
        })
    }
}

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: product '{id}'")]
    NotFound { id: i32 },

    #[error("invalid input value: {0}")]
    InvalidValue(#[from] ValidationError),

    #[error("product '{id}': {source}")]
    Images {
        id: i32,
        #[source]
        source: ImageListError,
    },
}

impl DbError {
    fn images(id: i32) -> impl FnOnce(ImageListError) -> Self {
        move |source| Self::Images { id, source }
    }
}

/// Product repository
pub struct ProductRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All products in storage order.
    pub async fn list(&self) -> Result<Vec<Product>, DbError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            "SELECT id, isim, aciklama, fiyat, miktar, gorsel FROM urunler ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let id = row.id;
                Product::try_from(row).map_err(DbError::images(id))
            })
            .collect()
    }

    /// Single product by primary key.
    pub async fn get(&self, id: i32) -> Result<Product, DbError> {
        let row: ProductRow = sqlx::query_as(
            "SELECT id, isim, aciklama, fiyat, miktar, gorsel FROM urunler WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(DbError::NotFound { id })?;

        Product::try_from(row).map_err(DbError::images(id))
    }

    /// Insert a product, returning the generated id.
    ///
    /// Fields are passed through as given; an absent `isim` is rejected by
    /// the NOT NULL constraint.
    pub async fn create(&self, product: &NewProduct) -> Result<i32, DbError> {
        let gorsel = product.gorsel.to_json().map_err(DbError::images(0))?;

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO urunler (isim, aciklama, fiyat, miktar, gorsel)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(product.isim.as_deref())
        .bind(product.aciklama.as_deref())
        .bind(product.fiyat)
        .bind(product.miktar)
        .bind(gorsel)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// Overwrite every column of an existing product in one statement.
    pub async fn update(&self, id: i32, update: &ProductUpdate) -> Result<(), DbError> {
        let gorsel = update.gorsel.to_json().map_err(DbError::images(id))?;

        let result = sqlx::query(
            r#"
            UPDATE urunler
            SET isim = $1, aciklama = $2, fiyat = $3, miktar = $4, gorsel = $5
            WHERE id = $6
            "#,
        )
        .bind(&update.isim)
        .bind(update.aciklama.as_deref())
        .bind(update.fiyat)
        .bind(update.miktar)
        .bind(gorsel)
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound { id });
        }
        Ok(())
    }

    /// Remove a product row.
    pub async fn delete(&self, id: i32) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM urunler WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound { id });
        }
        Ok(())
    }

    /// Round-trip a trivial query.
    pub async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, migrations};

    // Integration tests - run with DATABASE_URL set
    // cargo test -p katalog-server -- --ignored

    async fn pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");
        migrations::run(&pool).await.expect("migrations failed");
        pool
    }

    fn lamp() -> NewProduct {
        NewProduct {
            isim: Some("Lamp".into()),
            aciklama: None,
            fiyat: Some(19.5),
            miktar: Some(4),
            gorsel: ImageList::new(vec!["/uploads/1.png".into()]),
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_then_get_round_trips_images() {
        let pool = pool().await;
        let repo = ProductRepo::new(&pool);

        let id = repo.create(&lamp()).await.unwrap();
        let product = repo.get(id).await.unwrap();

        assert_eq!(product.isim, "Lamp");
        assert_eq!(product.fiyat, Some(19.5));
        assert_eq!(product.gorsel.paths(), ["/uploads/1.png"]);

        repo.delete(id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn missing_name_is_rejected_by_schema() {
        let pool = pool().await;
        let product = NewProduct {
            isim: None,
            ..lamp()
        };

        let err = ProductRepo::new(&pool).create(&product).await.unwrap_err();
        assert!(matches!(err, DbError::Sqlx(_)));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn absent_rows_are_not_found() {
        let pool = pool().await;
        let repo = ProductRepo::new(&pool);

        assert!(matches!(repo.get(-1).await, Err(DbError::NotFound { id: -1 })));
        assert!(matches!(repo.delete(-1).await, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn malformed_image_column_is_an_error() {
        let pool = pool().await;
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO urunler (isim, gorsel) VALUES ('Broken', 'not json') RETURNING id",
        )
        .fetch_one(&pool)
        .await
        .unwrap();

        let err = ProductRepo::new(&pool).get(id).await.unwrap_err();
        assert!(matches!(err, DbError::Images { .. }));

        ProductRepo::new(&pool).delete(id).await.unwrap();
    }
}
