//! Catalog domain types.

use chrono::{DateTime, Utc};

use corner_shop_core::{Price, ProductId};

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A partial update. `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub price: Option<Price>,
}

impl ProductChanges {
    /// Whether applying these changes would be a no-op.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none()
    }

    /// Apply the changes to a product in place.
    pub fn apply(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name.clone_from(name);
        }
        if let Some(price) = self.price {
            product.price = price;
        }
    }
}
