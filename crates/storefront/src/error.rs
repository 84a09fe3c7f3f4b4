//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`; every error leaves the process as a JSON body of the
//! form `{"error": "<message>"}`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Account operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Malformed or missing input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No caller could be resolved from the session.
    #[error("Authentication required")]
    Unauthenticated,

    /// The caller does not own the resource.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::MissingField(_)
                | AuthError::InvalidUsername(_)
                | AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Message safe to show to the client.
    #[must_use]
    pub fn client_message(&self) -> String {
        if self.status().is_server_error() {
            return "Internal server error".to_string();
        }

        match self {
            Self::Database(RepositoryError::NotFound) => "Not found".to_string(),
            Self::Database(RepositoryError::Conflict(msg))
            | Self::Validation(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg) => msg.clone(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials".to_string(),
                AuthError::UserAlreadyExists => "Username already exists".to_string(),
                AuthError::MissingField(_) => "Missing fields".to_string(),
                other => other.to_string(),
            },
            Self::Unauthenticated => "Authentication required".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = ErrorBody {
            error: self.client_message(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context after a successful login.
pub fn set_sentry_user(user_id: &impl ToString, username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: Some(username.to_owned()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context on logout.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
