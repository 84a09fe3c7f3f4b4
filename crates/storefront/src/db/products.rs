//! `PostgreSQL` catalog repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use corner_shop_core::{Price, ProductId};

use super::{ProductRepository, RepositoryError};
use crate::models::{Product, ProductChanges};

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    price: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price for product {}: {e}", row.id))
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            price,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for `shop.product`.
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r"
            SELECT id, name, price, created_at, updated_at
            FROM shop.product
            ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(
            r"
            SELECT id, name, price, created_at, updated_at
            FROM shop.product
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn create(&self, name: &str, price: Price) -> Result<Product, RepositoryError> {
        let row: ProductRow = sqlx::query_as(
            r"
            INSERT INTO shop.product (name, price)
            VALUES ($1, $2)
            RETURNING id, name, price, created_at, updated_at
            ",
        )
        .bind(name)
        .bind(price.amount())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "product already exists"))?;

        row.try_into()
    }

    #[instrument(skip(self))]
    async fn update(
        &self,
        id: ProductId,
        changes: &ProductChanges,
    ) -> Result<Option<Product>, RepositoryError> {
        // COALESCE keeps the stored value for every field left as NULL.
        let row: Option<ProductRow> = sqlx::query_as(
            r"
            UPDATE shop.product
            SET name = COALESCE($2, name),
                price = COALESCE($3, price),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, price, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.price.map(|p| p.amount()))
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        // cart_item.product_id is ON DELETE CASCADE
        let result = sqlx::query(
            r"
            DELETE FROM shop.product
            WHERE id = $1
            ",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
