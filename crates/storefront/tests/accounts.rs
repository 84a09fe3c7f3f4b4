//! Router tests for accounts, the login/signup pages and the probes.

mod common;

use axum::http::{Method, StatusCode, header};
use serde_json::json;

use common::{TestApp, body_json, body_text, location, session_cookie};

#[tokio::test]
async fn create_and_list_users() {
    let app = TestApp::new();

    let response = app
        .json(
            Method::POST,
            "/users",
            None,
            &json!({ "username": "alice", "email": "alice@shop.test", "password": "pw123456" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["message"], "User created");

    app.create_user("bob", "pw654321").await;

    let users = body_json(app.get("/users", None).await).await;
    assert_eq!(
        users,
        json!([
            { "id": 1, "username": "alice", "email": "alice@shop.test" },
            { "id": 2, "username": "bob", "email": null },
        ])
    );
}

#[tokio::test]
async fn create_user_errors() {
    let app = TestApp::new();
    app.create_user("alice", "pw123456").await;

    let response = app
        .json(
            Method::POST,
            "/users",
            None,
            &json!({ "username": "alice", "password": "another-pw" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"], "Username already exists");

    for body in [
        json!({ "username": "carol" }),
        json!({ "password": "pw123456" }),
        json!({ "username": "carol", "password": "" }),
        json!({ "username": "   ", "password": "pw123456" }),
        json!({ "username": "carol", "password": "pw123456", "email": "nope" }),
    ] {
        let response = app.json(Method::POST, "/users", None, &body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
    }
}

#[tokio::test]
async fn signup_form_redirects_to_login() {
    let app = TestApp::new();

    let response = app
        .form("/signup", None, "username=dave&password=pw123456&email=")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?success=signed_up");

    let page = body_text(app.get("/login?success=signed_up", None).await).await;
    assert!(page.contains("Signup successful"));

    app.login("dave", "pw123456").await;
}

#[tokio::test]
async fn signup_form_errors_redirect_back() {
    let app = TestApp::new();
    app.create_user("dave", "pw123456").await;

    for (body, code) in [
        ("username=&password=pw123456", "missing"),
        ("username=dave&password=pw123456", "taken"),
        ("username=erin&password=", "missing"),
    ] {
        let response = app.form("/signup", None, body).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), format!("/signup?error={code}"));
    }
}

#[tokio::test]
async fn wrong_password_does_not_log_in() {
    let app = TestApp::new();
    app.create_user("alice", "pw123456").await;

    let response = app
        .form("/login", None, "username=alice&password=wrong-password")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?error=credentials");
    assert!(session_cookie(&response).is_none());
}

#[tokio::test]
async fn pages_render() {
    let app = TestApp::new();
    app.create_product("Widget", json!(9.99)).await;

    let response = app.get("/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Widget"));
    assert!(page.contains("Log in"));

    let alice = app.user_session("alice").await;
    let page = body_text(app.get("/", Some(&alice)).await).await;
    assert!(page.contains("Signed in as alice"));

    let response = app.get("/signup", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("<form"));
}

#[tokio::test]
async fn health_probes() {
    let app = TestApp::new();

    let response = app.get("/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");

    let response = app.get("/health/ready", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn every_response_has_a_request_id() {
    let app = TestApp::new();

    let response = app.get("/health", None).await;
    let id = response.headers().get("x-request-id").unwrap();
    assert_eq!(id.to_str().unwrap().len(), 36);

    let response = app.get("/api/cart", None).await;
    assert!(response.headers().contains_key("x-request-id"));

    let mut request = common::request(Method::GET, "/health", None, axum::body::Body::empty());
    request
        .headers_mut()
        .insert("x-request-id", "edge-abc-123".parse().unwrap());
    let response = app.send(request).await;
    assert_eq!(response.headers()["x-request-id"], "edge-abc-123");
    assert!(!response.headers().contains_key(header::SET_COOKIE));
}
