//! Request ID middleware.
//!
//! Every response carries an `x-request-id` header. An ID supplied by an
//! upstream proxy is reused when it is short printable ASCII; otherwise a
//! UUID v4 is generated. The ID is recorded on the current span and tagged on
//! the Sentry scope.

use axum::{
    extract::Request,
    http::{HeaderValue, header::HeaderName},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_FORWARDED_ID_LENGTH: usize = 128;

/// Middleware that ensures every request has an ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|id| is_acceptable_id(id))
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    Span::current().record("request_id", request_id.as_str());

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    response
}

fn is_acceptable_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_FORWARDED_ID_LENGTH
        && id.bytes().all(|b| b.is_ascii_graphic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forwarded_id_filter() {
        assert!(is_acceptable_id("abc-123"));
        assert!(is_acceptable_id(&Uuid::new_v4().to_string()));
        assert!(!is_acceptable_id(""));
        assert!(!is_acceptable_id("has space"));
        assert!(!is_acceptable_id(&"x".repeat(MAX_FORWARDED_ID_LENGTH + 1)));
    }
}
