//! Account JSON API.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use corner_shop_core::{Email, UserId, Username};

use super::MessageResponse;
use crate::error::Result;
use crate::extract::ValidJson;
use crate::models::User;
use crate::services::AuthService;
use crate::state::AppState;

/// Account as exposed over the API. Never includes the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: Username,
    pub email: Option<Email>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

/// Body for `POST /users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: String,
    pub email: Option<String>,
    #[serde(default)]
    pub password: String,
}

/// `GET /users`
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>> {
    let users = AuthService::new(state.store()).list_users().await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// `POST /users`
pub async fn create(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    AuthService::new(state.store())
        .register(&body.username, body.email.as_deref(), &body.password)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User created")),
    ))
}
