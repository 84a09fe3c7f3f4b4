//! HTTP middleware and extractors for the storefront.
//!
//! # Layer order (outermost first)
//!
//! 1. Sentry (`NewSentryLayer` + `SentryHttpLayer`, binary only)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (recorded into the span, echoed in `x-request-id`)
//! 4. Session (`tower-sessions`, cookie `cs_session`)

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{OptionalAuth, RequireAuth, clear_current_user, set_current_user};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
