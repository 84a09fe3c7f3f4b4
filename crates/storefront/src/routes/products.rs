//! Product catalog JSON API.

use axum::{Json, extract::State, http::StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use corner_shop_core::{Price, ProductId};

use super::MessageResponse;
use crate::error::Result;
use crate::extract::{ValidJson, ValidPath};
use crate::models::Product;
use crate::services::CatalogService;
use crate::state::AppState;

/// Product as exposed over the API.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
        }
    }
}

/// Body for `POST /api/products` and `PUT /api/products/{id}`.
///
/// Prices may be sent as JSON numbers or numeric strings. Which fields are
/// required is decided by the handler.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub name: Option<String>,
    pub price: Option<Decimal>,
}

/// Response for a created product.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub id: ProductId,
}

/// `GET /api/products`
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<ProductResponse>>> {
    let products = CatalogService::new(state.store()).list_products().await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// `POST /api/products`
pub async fn create(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<ProductRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let product = CatalogService::new(state.store())
        .create_product(body.name.as_deref(), body.price)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Product added",
            id: product.id,
        }),
    ))
}

/// `PUT /api/products/{id}`
pub async fn update(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<ProductId>,
    ValidJson(body): ValidJson<ProductRequest>,
) -> Result<Json<MessageResponse>> {
    CatalogService::new(state.store())
        .update_product(id, body.name.as_deref(), body.price)
        .await?;
    Ok(Json(MessageResponse::new("Product updated")))
}

/// `DELETE /api/products/{id}`
pub async fn delete(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<ProductId>,
) -> Result<Json<MessageResponse>> {
    CatalogService::new(state.store()).delete_product(id).await?;
    Ok(Json(MessageResponse::new("Product deleted")))
}
