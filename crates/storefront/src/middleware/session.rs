//! Session layer configuration.
//!
//! The binary backs sessions with `PostgresStore`; tests use `MemoryStore`.
//! Both go through [`create_session_layer`] so cookie settings are identical.

use tower_sessions::{
    Expiry, SessionManagerLayer, SessionStore,
    cookie::{SameSite, time::Duration},
};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "cs_session";

/// Create the session layer over any session store.
///
/// The cookie is `HttpOnly`, `SameSite=Lax`, and `Secure` when the configured
/// base URL is HTTPS. Sessions expire after the configured days of inactivity.
#[must_use]
pub fn create_session_layer<S>(store: S, config: &StorefrontConfig) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::days(i64::from(
            config.session_expiry_days,
        ))))
        .with_secure(is_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
