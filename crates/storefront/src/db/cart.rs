//! `PostgreSQL` cart repository.
//!
//! The add-to-cart merge is a single upsert keyed on the
//! `cart_item_user_product_key` unique constraint, so concurrent adds for the
//! same `(user, product)` pair are serialized by the row lock instead of
//! racing a read-then-write.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use corner_shop_core::{CartItemId, Price, ProductId, Quantity, UserId};

use super::{CartRepository, RepositoryError};
use crate::models::{CartItem, CartLine};

#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    id: CartItemId,
    user_id: UserId,
    product_id: ProductId,
    quantity: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CartItemRow> for CartItem {
    type Error = RepositoryError;

    fn try_from(row: CartItemRow) -> Result<Self, Self::Error> {
        let quantity = Quantity::new(row.quantity).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid quantity on cart item {}: {e}", row.id))
        })?;

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            product_id: row.product_id,
            quantity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    line_id: CartItemId,
    product_id: ProductId,
    product_name: String,
    price: Decimal,
    quantity: i32,
}

impl TryFrom<CartLineRow> for CartLine {
    type Error = RepositoryError;

    fn try_from(row: CartLineRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid price: {e}")))?;
        let quantity = Quantity::new(row.quantity)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid quantity: {e}")))?;

        Ok(Self {
            line_id: row.line_id,
            product_id: row.product_id,
            product_name: row.product_name,
            price,
            quantity,
        })
    }
}

/// Repository for `shop.cart_item`.
pub struct PgCartRepository {
    pool: PgPool,
}

impl PgCartRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartRepository for PgCartRepository {
    async fn lines_for_user(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows: Vec<CartLineRow> = sqlx::query_as(
            r"
            SELECT c.id AS line_id, c.product_id, p.name AS product_name, p.price, c.quantity
            FROM shop.cart_item c
            JOIN shop.product p ON p.id = c.product_id
            WHERE c.user_id = $1
            ORDER BY c.id ASC
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CartLine::try_from).collect()
    }

    async fn get(&self, id: CartItemId) -> Result<Option<CartItem>, RepositoryError> {
        let row: Option<CartItemRow> = sqlx::query_as(
            r"
            SELECT id, user_id, product_id, quantity, created_at, updated_at
            FROM shop.cart_item
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CartItem::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn add_or_increment(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<CartItem, RepositoryError> {
        let row: CartItemRow = sqlx::query_as(
            r"
            INSERT INTO shop.cart_item (user_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT ON CONSTRAINT cart_item_user_product_key
            DO UPDATE SET quantity = shop.cart_item.quantity + EXCLUDED.quantity,
                          updated_at = now()
            RETURNING id, user_id, product_id, quantity, created_at, updated_at
            ",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(quantity.get())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "cart line conflict"))?;

        row.try_into()
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: CartItemId, user_id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM shop.cart_item
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn clear(&self, user_id: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM shop.cart_item
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
