//! Record store for the storefront.
//!
//! # Database: `corner_shop`
//!
//! ## Tables (schema `shop`)
//!
//! - `user` - Accounts (unique username, optional email, argon2 hash)
//! - `product` - Catalog entries
//! - `cart_item` - Cart lines, unique per `(user_id, product_id)`
//!
//! Sessions live in `tower_sessions.session`, created by the session store.
//!
//! # Backends
//!
//! Each table sits behind a repository trait. [`Store::postgres`] wires the
//! `sqlx` implementations; [`Store::in_memory`] wires [`InMemoryRecords`],
//! which keeps the same invariants (unique usernames, one line per
//! user/product pair, cascade on product delete) and is what the test suite
//! runs against.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p corner-shop-cli -- migrate
//! ```

pub mod cart;
pub mod memory;
pub mod products;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use corner_shop_core::{CartItemId, Price, ProductId, Quantity, UserId, Username};

use crate::models::{CartItem, CartLine, NewUser, Product, ProductChanges, User};

pub use cart::PgCartRepository;
pub use memory::InMemoryRecords;
pub use products::PgProductRepository;
pub use users::PgUserRepository;

/// Errors from the record store.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// A referenced record does not exist.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Classify a write error, turning constraint violations into
    /// `Conflict` / `NotFound`.
    pub(crate) fn from_write(e: sqlx::Error, conflict: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return Self::Conflict(conflict.to_owned());
            }
            if db_err.is_foreign_key_violation() {
                return Self::NotFound;
            }
            // numeric_value_out_of_range
            if db_err.code().as_deref() == Some("22003") {
                return Self::Conflict("value out of range".to_owned());
            }
        }
        Self::Database(e)
    }
}

/// Account storage.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert an account. `Conflict` if the username is taken.
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Fetch an account together with its password hash.
    async fn get_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError>;

    /// All accounts, in creation order.
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;
}

/// Catalog storage.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products, in creation order.
    async fn list(&self) -> Result<Vec<Product>, RepositoryError>;

    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    async fn create(&self, name: &str, price: Price) -> Result<Product, RepositoryError>;

    /// Apply a partial update. `None` if the product does not exist.
    async fn update(
        &self,
        id: ProductId,
        changes: &ProductChanges,
    ) -> Result<Option<Product>, RepositoryError>;

    /// Delete a product and every cart line referencing it.
    /// Returns `false` if it did not exist.
    async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError>;
}

/// Cart line storage.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// A user's lines joined with their products, in creation order.
    async fn lines_for_user(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError>;

    async fn get(&self, id: CartItemId) -> Result<Option<CartItem>, RepositoryError>;

    /// Create the `(user, product)` line or add `quantity` to the existing
    /// one, atomically. `NotFound` if the product does not exist.
    async fn add_or_increment(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<CartItem, RepositoryError>;

    /// Delete a line if it belongs to `user_id`. Returns `false` otherwise.
    async fn delete(&self, id: CartItemId, user_id: UserId) -> Result<bool, RepositoryError>;

    /// Delete all of a user's lines, returning how many were removed.
    async fn clear(&self, user_id: UserId) -> Result<u64, RepositoryError>;
}

/// Handles to every repository, cheap to clone.
#[derive(Clone)]
pub struct Store {
    users: Arc<dyn UserRepository>,
    products: Arc<dyn ProductRepository>,
    cart: Arc<dyn CartRepository>,
    pool: Option<PgPool>,
}

impl Store {
    /// Store backed by `PostgreSQL`.
    #[must_use]
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            products: Arc::new(PgProductRepository::new(pool.clone())),
            cart: Arc::new(PgCartRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Store backed by process memory. Contents are lost on drop.
    #[must_use]
    pub fn in_memory() -> Self {
        let records = Arc::new(InMemoryRecords::default());
        Self {
            users: records.clone(),
            products: records.clone(),
            cart: records,
            pool: None,
        }
    }

    #[must_use]
    pub fn users(&self) -> &dyn UserRepository {
        self.users.as_ref()
    }

    #[must_use]
    pub fn products(&self) -> &dyn ProductRepository {
        self.products.as_ref()
    }

    #[must_use]
    pub fn cart(&self) -> &dyn CartRepository {
        self.cart.as_ref()
    }

    /// Check that the backing database is reachable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the probe query fails.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
