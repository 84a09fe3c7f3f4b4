//! Cart domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use corner_shop_core::{CartItemId, Price, ProductId, Quantity, UserId};

/// A stored cart line: one (user, product, quantity) association.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cart line joined with its product, as shown to the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub line_id: CartItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub price: Price,
    pub quantity: Quantity,
}

impl CartLine {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.times(self.quantity.get())
    }
}

/// Totals across a user's cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartSummary {
    /// Sum of quantities across all lines.
    pub item_count: i64,
    /// Sum of line totals.
    pub subtotal: Decimal,
}

impl CartSummary {
    /// Summarize a set of cart lines.
    #[must_use]
    pub fn of(lines: &[CartLine]) -> Self {
        lines.iter().fold(Self::default(), |acc, line| Self {
            item_count: acc.item_count + i64::from(line.quantity.get()),
            subtotal: acc.subtotal + line.line_total(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: i32, price: &str, quantity: i32) -> CartLine {
        CartLine {
            line_id: CartItemId::new(id),
            product_id: ProductId::new(id),
            product_name: format!("product-{id}"),
            price: price.parse().unwrap_or_default(),
            quantity: Quantity::new(quantity).unwrap_or_default(),
        }
    }

    #[test]
    fn test_summary_of_empty_cart() {
        assert_eq!(CartSummary::of(&[]), CartSummary::default());
    }

    #[test]
    fn test_summary_totals() {
        let summary = CartSummary::of(&[line(1, "9.99", 2), line(2, "0.50", 3)]);
        assert_eq!(summary.item_count, 5);
        assert_eq!(summary.subtotal, Decimal::new(2148, 2));
    }
}
