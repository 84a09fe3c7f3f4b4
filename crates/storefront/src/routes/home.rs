//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};

use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::models::{CartSummary, CurrentUser, Product};
use crate::services::{CartService, CatalogService};
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub current_user: Option<CurrentUser>,
    pub products: Vec<Product>,
    pub cart: Option<CartSummary>,
}

/// Display the home page: the catalog, plus a cart badge when logged in.
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
) -> Result<impl IntoResponse> {
    let products = CatalogService::new(state.store()).list_products().await?;
    let cart = match &current_user {
        Some(user) => Some(
            CartService::new(state.store())
                .cart_summary(user.id)
                .await?,
        ),
        None => None,
    };

    Ok(HomeTemplate {
        current_user,
        products,
        cart,
    })
}
