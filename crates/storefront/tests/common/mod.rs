//! Shared helpers for router-level tests.
//!
//! Builds the same router as the binary, but over the in-memory record store
//! and an in-memory session store, so no database is needed.

#![allow(dead_code, clippy::unwrap_used)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, Response, StatusCode, header};
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use corner_shop_storefront::config::StorefrontConfig;
use corner_shop_storefront::db::Store;
use corner_shop_storefront::middleware::create_session_layer;
use corner_shop_storefront::state::AppState;

pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from("postgres://unused"),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        session_expiry_days: 7,
        sentry_dsn: None,
        sentry_environment: None,
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Store,
}

impl TestApp {
    pub fn new() -> Self {
        let config = test_config();
        let store = Store::in_memory();
        let session_layer = create_session_layer(MemoryStore::default(), &config);
        let router = corner_shop_storefront::app(AppState::new(config, store.clone()), session_layer);
        Self { router, store }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        self.send(request(Method::GET, uri, cookie, Body::empty()))
            .await
    }

    pub async fn delete(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        self.send(request(Method::DELETE, uri, cookie, Body::empty()))
            .await
    }

    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: &Value,
    ) -> Response<Body> {
        let mut req = request(method, uri, cookie, Body::from(body.to_string()));
        req.headers_mut().insert(
            header::CONTENT_TYPE,
            "application/json".parse().unwrap(),
        );
        self.send(req).await
    }

    pub async fn form(&self, uri: &str, cookie: Option<&str>, body: &str) -> Response<Body> {
        let mut req = request(Method::POST, uri, cookie, Body::from(body.to_owned()));
        req.headers_mut().insert(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded".parse().unwrap(),
        );
        self.send(req).await
    }

    /// Create an account through `POST /users`.
    pub async fn create_user(&self, username: &str, password: &str) {
        let response = self
            .json(
                Method::POST,
                "/users",
                None,
                &serde_json::json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    /// Log in through the form and return the session cookie (`name=value`).
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .form(
                "/login",
                None,
                &format!("username={username}&password={password}"),
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        session_cookie(&response).expect("login should set a session cookie")
    }

    /// Create an account and log in as it.
    pub async fn user_session(&self, username: &str) -> String {
        self.create_user(username, "pw123").await;
        self.login(username, "pw123").await
    }

    /// Create a product through the API and return its ID.
    pub async fn create_product(&self, name: &str, price: Value) -> i64 {
        let response = self
            .json(
                Method::POST,
                "/api/products",
                None,
                &serde_json::json!({ "name": name, "price": price }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["id"].as_i64().unwrap()
    }
}

pub fn request(method: Method, uri: &str, cookie: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(body).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// The `name=value` part of the session `Set-Cookie` header, if any.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("cs_session="))
        .and_then(|v| v.split(';').next())
        .map(str::to_owned)
}
