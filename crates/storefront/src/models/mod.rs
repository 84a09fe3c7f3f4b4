//! Domain models for the storefront.
//!
//! These are validated domain objects, separate from the row types used by
//! the `db` layer.

pub mod cart;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{CartItem, CartLine, CartSummary};
pub use product::{Product, ProductChanges};
pub use session::{CurrentUser, keys as session_keys};
pub use user::{NewUser, User};
