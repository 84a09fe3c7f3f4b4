//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                     - Home page
//! GET    /health               - Liveness probe
//! GET    /health/ready         - Readiness probe (checks the store)
//!
//! # Pages
//! GET    /login                - Login page
//! POST   /login                - Login action
//! GET    /signup               - Signup page
//! POST   /signup               - Signup action
//! POST   /logout               - Logout action
//!
//! # Accounts (JSON)
//! GET    /users                - List accounts
//! POST   /users                - Create account
//!
//! # Catalog (JSON)
//! GET    /api/products         - List products
//! POST   /api/products         - Create product
//! PUT    /api/products/{id}    - Update product
//! DELETE /api/products/{id}    - Delete product
//!
//! # Cart (JSON, requires login)
//! GET    /api/cart             - Current user's cart
//! POST   /api/cart             - Add to cart (merges into an existing line)
//! DELETE /api/cart/clear       - Empty the cart
//! DELETE /api/cart/{id}        - Remove one line
//! ```

pub mod auth;
pub mod cart;
pub mod health;
pub mod home;
pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use serde::Serialize;

use crate::state::AppState;

/// `{"message": ...}` body for successful mutations.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    #[must_use]
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// Create the page routes router.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/logout", post(auth::logout))
}

/// Create the product API routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/{id}", put(products::update).delete(products::delete))
}

/// Create the cart API routes router.
pub fn cart_routes() -> Router<AppState> {
    // Static segments win over captures, so /clear never reaches remove.
    Router::new()
        .route("/", get(cart::show).post(cart::add))
        .route("/clear", delete(cart::clear))
        .route("/{id}", delete(cart::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(page_routes())
        .route("/users", get(users::index).post(users::create))
        .nest("/api/products", product_routes())
        .nest("/api/cart", cart_routes())
}
