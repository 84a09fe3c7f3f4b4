//! Catalog service.
//!
//! Validates product input before it reaches the repository. Deleting a
//! product also removes every cart line that references it.

use rust_decimal::Decimal;
use tracing::instrument;

use corner_shop_core::{Price, ProductId};

use crate::db::{ProductRepository, Store};
use crate::error::{AppError, Result};
use crate::models::{Product, ProductChanges};

/// Maximum product name length, matching `shop.product.name`.
const MAX_NAME_LENGTH: usize = 150;

/// Product catalog operations.
pub struct CatalogService<'a> {
    products: &'a dyn ProductRepository,
}

impl<'a> CatalogService<'a> {
    #[must_use]
    pub fn new(store: &'a Store) -> Self {
        Self {
            products: store.products(),
        }
    }

    /// All products in creation order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the store fails.
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        Ok(self.products.list().await?)
    }

    /// A single product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no product has this ID.
    pub async fn get_product(&self, id: ProductId) -> Result<Product> {
        self.products
            .get(id)
            .await?
            .ok_or_else(product_not_found)
    }

    /// Create a product. Both fields are required.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the name is blank or the price is
    /// missing or negative.
    #[instrument(skip(self))]
    pub async fn create_product(
        &self,
        name: Option<&str>,
        price: Option<Decimal>,
    ) -> Result<Product> {
        let (Some(name), Some(price)) = (name, price) else {
            return Err(AppError::Validation("Missing fields".to_owned()));
        };
        let name = validate_name(name)?;
        let price = validate_price(price)?;

        let product = self.products.create(&name, price).await?;
        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Update the supplied fields of a product, leaving the rest unchanged.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the product does not exist and
    /// `AppError::Validation` if a supplied field is invalid.
    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        id: ProductId,
        name: Option<&str>,
        price: Option<Decimal>,
    ) -> Result<Product> {
        let changes = ProductChanges {
            name: name.map(validate_name).transpose()?,
            price: price.map(validate_price).transpose()?,
        };

        if changes.is_empty() {
            return self.get_product(id).await;
        }

        self.products
            .update(id, &changes)
            .await?
            .ok_or_else(product_not_found)
    }

    /// Delete a product together with the cart lines that reference it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the product does not exist.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<()> {
        if !self.products.delete(id).await? {
            return Err(product_not_found());
        }
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}

fn product_not_found() -> AppError {
    AppError::NotFound("Product not found".to_owned())
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_owned()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::Validation(format!(
            "name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(name.to_owned())
}

fn validate_price(price: Decimal) -> Result<Price> {
    Price::new(price).map_err(|e| AppError::Validation(e.to_string()))
}
