use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::{NewProduct, Price, Product, ProductId, Result, store::ProductStore};

const PRODUCT_COLUMNS: &str = "id, image, title, price, description, created_at";

/// PostgreSQL-backed product store.
///
/// The price is kept as a JSONB document next to the scalar columns.
#[derive(Clone)]
pub struct PostgresProductStore {
    pool: PgPool,
}

impl PostgresProductStore {
    /// Wraps an existing pool. The schema is assumed to be migrated.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects, runs migrations and pings the database.
    ///
    /// Any failure is returned to the caller; the process is expected to stop
    /// rather than serve requests without a working store.
    #[tracing::instrument(skip(database_url))]
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        let store = Self::new(pool);
        store.run_migrations().await?;
        store.health_check().await?;

        tracing::info!("product store ready");
        Ok(store)
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    /// Closes every pooled connection. Subsequent calls fail.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("product store closed");
    }

    fn row_to_product(row: PgRow) -> Result<Product> {
        let Json(price): Json<Price> = row.try_get("price")?;

        Ok(Product {
            id: ProductId::from_uuid(row.try_get::<Uuid, _>("id")?),
            image: row.try_get("image")?,
            title: row.try_get("title")?,
            price,
            description: row.try_get("description")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    #[tracing::instrument(skip(self, product))]
    async fn create(&self, product: NewProduct) -> Result<Product> {
        let validated = product.validate()?;
        let id = ProductId::new();

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO products (id, image, title, price, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(&validated.image)
        .bind(&validated.title)
        .bind(Json(validated.price))
        .bind(&validated.description)
        .fetch_one(&self.pool)
        .await?;

        let product = Self::row_to_product(row)?;
        tracing::debug!(product_id = %product.id, "product inserted");
        Ok(product)
    }

    async fn fetch_any(&self) -> Result<Option<Product>> {
        let row: Option<PgRow> = sqlx::query(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            ORDER BY created_at ASC, id ASC
            LIMIT 1
            "#
        ))
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_product).transpose()
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
