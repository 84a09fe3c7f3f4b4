//! Seed the catalog with demo products.

use rust_decimal::Decimal;

use corner_shop_storefront::db::Store;
use corner_shop_storefront::services::CatalogService;

use super::{CommandError, connect};

/// Demo catalog as `(name, price in cents)`.
const DEMO_PRODUCTS: &[(&str, i64)] = &[
    ("Widget", 999),
    ("Gadget", 2450),
    ("Doohickey", 375),
    ("Sticker", 0),
];

/// Insert the demo catalog unless the catalog already has products.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn catalog() -> Result<(), CommandError> {
    let store = Store::postgres(connect().await?);
    let catalog = CatalogService::new(&store);

    let existing = catalog.list_products().await?.len();
    if existing > 0 {
        tracing::info!(existing, "Catalog is not empty, skipping seed");
        return Ok(());
    }

    for &(name, cents) in DEMO_PRODUCTS {
        let product = catalog
            .create_product(Some(name), Some(Decimal::new(cents, 2)))
            .await?;
        tracing::info!(id = %product.id, "Seeded {} at {}", product.name, product.price);
    }

    tracing::info!("Seeded {} products", DEMO_PRODUCTS.len());
    Ok(())
}
