//! Cart service.
//!
//! Every operation is scoped to the calling user. Adding a product that is
//! already in the cart accumulates its quantity on the existing line, and a
//! line can only be removed by the user who owns it.

use tracing::instrument;

use corner_shop_core::{CartItemId, ProductId, Quantity, UserId};

use crate::db::{CartRepository, ProductRepository, RepositoryError, Store};
use crate::error::{AppError, Result};
use crate::models::{CartItem, CartLine, CartSummary};

/// Per-user cart operations.
pub struct CartService<'a> {
    cart: &'a dyn CartRepository,
    products: &'a dyn ProductRepository,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub fn new(store: &'a Store) -> Self {
        Self {
            cart: store.cart(),
            products: store.products(),
        }
    }

    /// The user's cart lines joined with their products, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the store fails.
    pub async fn get_cart(&self, user_id: UserId) -> Result<Vec<CartLine>> {
        Ok(self.cart.lines_for_user(user_id).await?)
    }

    /// Add `quantity` units of a product to the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the product does not exist and
    /// `AppError::Validation` if the merged quantity would overflow.
    #[instrument(skip(self))]
    pub async fn add_to_cart(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<CartItem> {
        if self.products.get(product_id).await?.is_none() {
            return Err(AppError::NotFound("Product not found".to_owned()));
        }

        // The product can still vanish between the check and the write; the
        // repository reports that as NotFound too.
        let item = self
            .cart
            .add_or_increment(user_id, product_id, quantity)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AppError::NotFound("Product not found".to_owned()),
                RepositoryError::Conflict(_) => {
                    AppError::Validation("quantity is too large".to_owned())
                }
                other => AppError::Database(other),
            })?;

        tracing::debug!(cart_item_id = %item.id, quantity = item.quantity.get(), "Cart line updated");
        Ok(item)
    }

    /// Remove one line from the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no line has this ID (whoever asks) and
    /// `AppError::Forbidden` if it belongs to another user.
    #[instrument(skip(self))]
    pub async fn remove_from_cart(&self, user_id: UserId, line_id: CartItemId) -> Result<()> {
        let item = self
            .cart
            .get(line_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cart item not found".to_owned()))?;

        if item.user_id != user_id {
            tracing::warn!(cart_item_id = %line_id, "Attempt to remove another user's cart line");
            return Err(AppError::Forbidden(
                "Cart item belongs to another user".to_owned(),
            ));
        }

        if !self.cart.delete(line_id, user_id).await? {
            return Err(AppError::NotFound("Cart item not found".to_owned()));
        }
        Ok(())
    }

    /// Remove every line from the user's cart. Clearing an empty cart succeeds.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the store fails.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self, user_id: UserId) -> Result<u64> {
        let removed = self.cart.clear(user_id).await?;
        tracing::debug!(removed, "Cart cleared");
        Ok(removed)
    }

    /// Item count and subtotal for the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the store fails.
    pub async fn cart_summary(&self, user_id: UserId) -> Result<CartSummary> {
        let lines = self.get_cart(user_id).await?;
        Ok(CartSummary::of(&lines))
    }
}
