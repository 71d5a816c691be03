//! Schema for the product table

use sqlx::PgPool;

/// Create the `urunler` table if it does not exist.
///
/// `gorsel` holds the image list as JSON text, not a child table.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running catalog migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS urunler (
            id SERIAL PRIMARY KEY,
            isim TEXT NOT NULL,
            aciklama TEXT,
            fiyat DOUBLE PRECISION,
            miktar INTEGER,
            gorsel TEXT NOT NULL DEFAULT '[]'
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Catalog migrations complete");
    Ok(())
}
