//! Cart JSON API. Every handler requires a logged-in user.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use corner_shop_core::{CartItemId, Price, ProductId, Quantity};

use super::MessageResponse;
use crate::error::{AppError, Result};
use crate::extract::{ValidJson, ValidPath};
use crate::middleware::RequireAuth;
use crate::models::CartLine;
use crate::services::CartService;
use crate::state::AppState;

/// One cart line as exposed over the API.
#[derive(Debug, Serialize)]
pub struct CartLineResponse {
    pub id: CartItemId,
    pub product: String,
    pub price: Price,
    pub quantity: Quantity,
}

impl From<CartLine> for CartLineResponse {
    fn from(line: CartLine) -> Self {
        Self {
            id: line.line_id,
            product: line.product_name,
            price: line.price,
            quantity: line.quantity,
        }
    }
}

/// Body for `POST /api/cart`.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: Option<ProductId>,
    pub quantity: Option<i32>,
}

impl AddToCartRequest {
    /// Resolve the product and quantity, defaulting the quantity to one.
    fn validate(self) -> Result<(ProductId, Quantity)> {
        let product_id = self
            .product_id
            .ok_or_else(|| AppError::Validation("Missing product_id".to_owned()))?;
        let quantity = self
            .quantity
            .map_or(Ok(Quantity::ONE), Quantity::new)
            .map_err(|e| AppError::Validation(e.to_string()))?;
        Ok((product_id, quantity))
    }
}

/// `GET /api/cart`
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<CartLineResponse>>> {
    let lines = CartService::new(state.store()).get_cart(user.id).await?;
    Ok(Json(lines.into_iter().map(Into::into).collect()))
}

/// `POST /api/cart`
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ValidJson(body): ValidJson<AddToCartRequest>,
) -> Result<Json<MessageResponse>> {
    let (product_id, quantity) = body.validate()?;
    CartService::new(state.store())
        .add_to_cart(user.id, product_id, quantity)
        .await?;
    Ok(Json(MessageResponse::new("Item added to cart")))
}

/// `DELETE /api/cart/{id}`
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ValidPath(id): ValidPath<CartItemId>,
) -> Result<Json<MessageResponse>> {
    CartService::new(state.store())
        .remove_from_cart(user.id, id)
        .await?;
    Ok(Json(MessageResponse::new("Item removed from cart")))
}

/// `DELETE /api/cart/clear`
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<MessageResponse>> {
    CartService::new(state.store()).clear_cart(user.id).await?;
    Ok(Json(MessageResponse::new("Cart cleared")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(json: &str) -> AddToCartRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_quantity_defaults_to_one() {
        let (product_id, quantity) = request(r#"{"product_id": 3}"#).validate().unwrap();
        assert_eq!(product_id, ProductId::new(3));
        assert_eq!(quantity, Quantity::ONE);
    }

    #[test]
    fn test_rejects_missing_product_and_bad_quantity() {
        for body in [
            r#"{"quantity": 2}"#,
            r#"{"product_id": 3, "quantity": 0}"#,
            r#"{"product_id": 3, "quantity": -4}"#,
        ] {
            assert!(matches!(
                request(body).validate(),
                Err(AppError::Validation(_))
            ));
        }
    }
}
