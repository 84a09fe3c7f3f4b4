//! Corner Shop storefront library.
//!
//! Accounts, a product catalog and a per-user cart behind an axum router.
//! The binary wires it to `PostgreSQL`; tests drive the same router over the
//! in-memory store.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, extract::Request};
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::state::AppState;

/// Build the storefront router with its tracing, request-ID and session
/// layers.
pub fn app<S>(state: AppState, session_layer: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    routes::routes()
        .layer(session_layer)
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                    user_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}
