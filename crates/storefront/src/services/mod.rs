//! Business logic services for the storefront.
//!
//! Services borrow repository handles from a [`Store`](crate::db::Store) and
//! are constructed per request; they hold no state of their own.
//!
//! - `auth` - Account registration and password login
//! - `catalog` - Product CRUD
//! - `cart` - Per-user cart with merge-on-add and ownership checks

pub mod auth;
pub mod cart;
pub mod catalog;

pub use auth::{AuthError, AuthService};
pub use cart::CartService;
pub use catalog::CatalogService;
