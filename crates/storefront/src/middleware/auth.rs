//! Session-backed identity extractors.
//!
//! The logged-in user is stored in the session under
//! [`session_keys::CURRENT_USER`] at login and removed at logout. Handlers ask
//! for the caller through [`RequireAuth`] or [`OptionalAuth`]; services never
//! touch the session.

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{CurrentUser, session_keys};

/// Extractor that requires a logged-in user.
///
/// Rejects JSON API requests with `401 {"error": "Authentication required"}`
/// and redirects page requests to `/login`.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Rejection for [`RequireAuth`].
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// JSON 401 (for API requests).
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::Unauthorized => AppError::Unauthenticated.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Nested routers see a stripped URI; the original path decides.
        let is_api = parts
            .extensions
            .get::<OriginalUri>()
            .map_or(parts.uri.path(), |uri| uri.path())
            .starts_with("/api/");
        let reject = || {
            if is_api {
                AuthRejection::Unauthorized
            } else {
                AuthRejection::RedirectToLogin
            }
        };

        let Some(session) = parts.extensions.get::<Session>() else {
            return Err(reject());
        };

        // A session that fails to load or decode is treated as anonymous.
        let user = session
            .get::<CurrentUser>(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or_else(reject)?;

        tracing::Span::current().record("user_id", user.id.as_i32());

        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current user.
///
/// Never rejects; anonymous callers yield `None`.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Store the logged-in user in the session.
///
/// The session ID is cycled first so a pre-login cookie cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Forget the logged-in user (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
