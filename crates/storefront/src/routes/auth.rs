//! Login, signup and logout pages.
//!
//! Form handlers always answer with a `303 See Other`; failures go back to
//! the form with an `error` query parameter the template turns into a
//! message.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Signup form data.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub email: Option<String>,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub current_user: Option<CurrentUser>,
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub current_user: Option<CurrentUser>,
    pub error: Option<&'static str>,
}

/// Map an `error` query code to a message. Unknown codes show nothing.
fn error_message(code: Option<&str>) -> Option<&'static str> {
    match code? {
        "credentials" => Some("Invalid username or password."),
        "missing" => Some("Username and password are required."),
        "username" => Some("Usernames can be at most 150 characters."),
        "email" => Some("That email address doesn't look right."),
        "taken" => Some("That username is already taken."),
        "session" | "server" => Some("Something went wrong. Please try again."),
        _ => None,
    }
}

fn success_message(code: Option<&str>) -> Option<&'static str> {
    match code? {
        "signed_up" => Some("Signup successful! Please log in."),
        _ => None,
    }
}

/// Error code for a failed signup.
const fn signup_error_code(err: &AuthError) -> &'static str {
    match err {
        AuthError::MissingField(_) => "missing",
        AuthError::InvalidUsername(_) => "username",
        AuthError::InvalidEmail(_) => "email",
        AuthError::UserAlreadyExists => "taken",
        AuthError::InvalidCredentials | AuthError::Repository(_) | AuthError::PasswordHash => {
            "server"
        }
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    OptionalAuth(current_user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    LoginTemplate {
        current_user,
        error: error_message(query.error.as_deref()),
        success: success_message(query.success.as_deref()),
    }
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let user = match AuthService::new(state.store())
        .login(&form.username, &form.password)
        .await
    {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => {
            tracing::info!("Login failed: invalid credentials");
            return Redirect::to("/login?error=credentials").into_response();
        }
        Err(e) => {
            tracing::error!("Login failed: {e}");
            return Redirect::to("/login?error=server").into_response();
        }
    };

    let current_user = CurrentUser::from(&user);
    if let Err(e) = set_current_user(&session, &current_user).await {
        tracing::error!("Failed to set session: {e}");
        return Redirect::to("/login?error=session").into_response();
    }

    set_sentry_user(&user.id, user.username.as_str());
    tracing::info!(user_id = %user.id, "User logged in");
    Redirect::to("/").into_response()
}

// =============================================================================
// Signup Routes
// =============================================================================

/// Display the signup page.
pub async fn signup_page(
    OptionalAuth(current_user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    SignupTemplate {
        current_user,
        error: error_message(query.error.as_deref()),
    }
}

/// Handle signup form submission.
pub async fn signup(State(state): State<AppState>, Form(form): Form<SignupForm>) -> Response {
    match AuthService::new(state.store())
        .register(&form.username, form.email.as_deref(), &form.password)
        .await
    {
        Ok(_) => Redirect::to("/login?success=signed_up").into_response(),
        Err(e) => {
            let code = signup_error_code(&e);
            if code == "server" {
                tracing::error!("Signup failed: {e}");
            } else {
                tracing::info!("Signup rejected: {e}");
            }
            Redirect::to(&format!("/signup?error={code}")).into_response()
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }
    clear_sentry_user();
    Redirect::to("/").into_response()
}
