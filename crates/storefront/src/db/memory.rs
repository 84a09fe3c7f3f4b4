//! In-process record store.
//!
//! All three tables live behind one lock so cross-table invariants (cart
//! joins, cascade on product delete) hold exactly as they do in `PostgreSQL`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use corner_shop_core::{CartItemId, Price, ProductId, Quantity, UserId, Username};

use super::{CartRepository, ProductRepository, RepositoryError, UserRepository};
use crate::models::{CartItem, CartLine, NewUser, Product, ProductChanges, User};

#[derive(Default)]
struct Tables {
    users: BTreeMap<UserId, (User, String)>,
    products: BTreeMap<ProductId, Product>,
    cart_items: BTreeMap<CartItemId, CartItem>,
    last_user_id: i32,
    last_product_id: i32,
    last_cart_item_id: i32,
}

/// Implements every repository trait over in-memory maps.
///
/// IDs are assigned sequentially from 1 per table, and maps are ordered by
/// ID, so listing order is insertion order.
#[derive(Default)]
pub struct InMemoryRecords {
    tables: RwLock<Tables>,
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

#[async_trait]
impl UserRepository for InMemoryRecords {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|(existing, _)| existing.username == user.username)
        {
            return Err(RepositoryError::Conflict(
                "username already exists".to_owned(),
            ));
        }

        let id = UserId::new(next_id(&mut tables.last_user_id));
        let created = User {
            id,
            username: user.username,
            email: user.email,
            created_at: Utc::now(),
        };
        tables
            .users
            .insert(id, (created.clone(), user.password_hash));
        Ok(created)
    }

    async fn get_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|(user, _)| &user.username == username)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().map(|(user, _)| user.clone()).collect())
    }
}

#[async_trait]
impl ProductRepository for InMemoryRecords {
    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.products.values().cloned().collect())
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.products.get(&id).cloned())
    }

    async fn create(&self, name: &str, price: Price) -> Result<Product, RepositoryError> {
        let mut tables = self.tables.write().await;
        let id = ProductId::new(next_id(&mut tables.last_product_id));
        let now = Utc::now();
        let product = Product {
            id,
            name: name.to_owned(),
            price,
            created_at: now,
            updated_at: now,
        };
        tables.products.insert(id, product.clone());
        Ok(product)
    }

    async fn update(
        &self,
        id: ProductId,
        changes: &ProductChanges,
    ) -> Result<Option<Product>, RepositoryError> {
        let mut tables = self.tables.write().await;
        let Some(product) = tables.products.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply(product);
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.products.remove(&id).is_none() {
            return Ok(false);
        }
        tables.cart_items.retain(|_, item| item.product_id != id);
        Ok(true)
    }
}

#[async_trait]
impl CartRepository for InMemoryRecords {
    async fn lines_for_user(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let tables = self.tables.read().await;
        tables
            .cart_items
            .values()
            .filter(|item| item.user_id == user_id)
            .map(|item| {
                let product = tables.products.get(&item.product_id).ok_or_else(|| {
                    RepositoryError::DataCorruption(format!(
                        "cart item {} references missing product {}",
                        item.id, item.product_id
                    ))
                })?;
                Ok(CartLine {
                    line_id: item.id,
                    product_id: product.id,
                    product_name: product.name.clone(),
                    price: product.price,
                    quantity: item.quantity,
                })
            })
            .collect()
    }

    async fn get(&self, id: CartItemId) -> Result<Option<CartItem>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.cart_items.get(&id).cloned())
    }

    async fn add_or_increment(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<CartItem, RepositoryError> {
        // Lookup and write happen under the same write guard.
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) || !tables.products.contains_key(&product_id) {
            return Err(RepositoryError::NotFound);
        }

        let now = Utc::now();
        if let Some(item) = tables
            .cart_items
            .values_mut()
            .find(|item| item.user_id == user_id && item.product_id == product_id)
        {
            let total = item
                .quantity
                .get()
                .checked_add(quantity.get())
                .and_then(|q| Quantity::new(q).ok())
                .ok_or_else(|| RepositoryError::Conflict("value out of range".to_owned()))?;
            item.quantity = total;
            item.updated_at = now;
            return Ok(item.clone());
        }

        let id = CartItemId::new(next_id(&mut tables.last_cart_item_id));
        let item = CartItem {
            id,
            user_id,
            product_id,
            quantity,
            created_at: now,
            updated_at: now,
        };
        tables.cart_items.insert(id, item.clone());
        Ok(item)
    }

    async fn delete(&self, id: CartItemId, user_id: UserId) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        match tables.cart_items.get(&id) {
            Some(item) if item.user_id == user_id => {
                tables.cart_items.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn clear(&self, user_id: UserId) -> Result<u64, RepositoryError> {
        let mut tables = self.tables.write().await;
        let before = tables.cart_items.len();
        tables.cart_items.retain(|_, item| item.user_id != user_id);
        Ok(u64::try_from(before - tables.cart_items.len()).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn seeded() -> (InMemoryRecords, UserId, ProductId) {
        let records = InMemoryRecords::default();
        let user = UserRepository::create(
            &records,
            NewUser {
                username: Username::parse("alice").unwrap(),
                email: None,
                password_hash: "hash".to_owned(),
            },
        )
        .await
        .unwrap();
        let product = ProductRepository::create(&records, "Widget", "9.99".parse().unwrap())
            .await
            .unwrap();
        (records, user.id, product.id)
    }

    #[tokio::test]
    async fn test_ids_are_sequential_per_table() {
        let (records, user_id, product_id) = seeded().await;
        assert_eq!(user_id, UserId::new(1));
        assert_eq!(product_id, ProductId::new(1));

        let second = ProductRepository::create(&records, "Gadget", Price::ZERO)
            .await
            .unwrap();
        assert_eq!(second.id, ProductId::new(2));
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let (records, _, _) = seeded().await;
        let result = UserRepository::create(
            &records,
            NewUser {
                username: Username::parse("alice").unwrap(),
                email: None,
                password_hash: "other".to_owned(),
            },
        )
        .await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_add_or_increment_merges() {
        let (records, user_id, product_id) = seeded().await;
        let first = records
            .add_or_increment(user_id, product_id, Quantity::new(2).unwrap())
            .await
            .unwrap();
        let second = records
            .add_or_increment(user_id, product_id, Quantity::new(3).unwrap())
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.quantity.get(), 5);
        assert_eq!(records.lines_for_user(user_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_for_missing_product_is_not_found() {
        let (records, user_id, _) = seeded().await;
        let result = records
            .add_or_increment(user_id, ProductId::new(99), Quantity::ONE)
            .await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn test_quantity_overflow_is_rejected() {
        let (records, user_id, product_id) = seeded().await;
        records
            .add_or_increment(user_id, product_id, Quantity::new(i32::MAX).unwrap())
            .await
            .unwrap();
        let result = records
            .add_or_increment(user_id, product_id, Quantity::ONE)
            .await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));

        let lines = records.lines_for_user(user_id).await.unwrap();
        assert_eq!(lines[0].quantity.get(), i32::MAX);
    }

    #[tokio::test]
    async fn test_delete_product_cascades_to_cart() {
        let (records, user_id, product_id) = seeded().await;
        records
            .add_or_increment(user_id, product_id, Quantity::ONE)
            .await
            .unwrap();

        assert!(ProductRepository::delete(&records, product_id).await.unwrap());
        assert!(records.lines_for_user(user_id).await.unwrap().is_empty());
        assert!(!ProductRepository::delete(&records, product_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_line_requires_owner() {
        let (records, user_id, product_id) = seeded().await;
        let item = records
            .add_or_increment(user_id, product_id, Quantity::ONE)
            .await
            .unwrap();

        assert!(!CartRepository::delete(&records, item.id, UserId::new(2)).await.unwrap());
        assert!(CartRepository::delete(&records, item.id, user_id).await.unwrap());
        assert!(CartRepository::get(&records, item.id).await.unwrap().is_none());
    }
}
