//! Router tests for the cart API.

mod common;

use axum::body::Body;
use axum::http::{Method, StatusCode, header};
use serde_json::json;
use tower::ServiceExt;

use common::{TestApp, body_json};

#[tokio::test]
async fn alice_signs_up_shops_and_checks_her_cart() {
    let app = TestApp::new();

    let response = app
        .json(
            Method::POST,
            "/users",
            None,
            &json!({ "username": "alice", "password": "pw123" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let alice = app.login("alice", "pw123").await;
    let widget = app.create_product("Widget", json!(9.99)).await;

    for _ in 0..2 {
        let response = app
            .json(
                Method::POST,
                "/api/cart",
                Some(&alice),
                &json!({ "product_id": widget }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let cart = body_json(app.get("/api/cart", Some(&alice)).await).await;
    assert_eq!(cart.as_array().unwrap().len(), 1);
    assert_eq!(cart[0]["product"], "Widget");
    assert_eq!(cart[0]["price"], json!(9.99));
    assert_eq!(cart[0]["quantity"], 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_do_not_lose_increments() {
    const ADDS: usize = 50;

    let app = TestApp::new();
    let alice = app.user_session("alice").await;
    let widget = app.create_product("Widget", json!(2)).await;

    let tasks: Vec<_> = (0..ADDS)
        .map(|_| {
            let router = app.router.clone();
            let mut request = common::request(
                Method::POST,
                "/api/cart",
                Some(&alice),
                Body::from(json!({ "product_id": widget }).to_string()),
            );
            request
                .headers_mut()
                .insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
            tokio::spawn(async move { router.oneshot(request).await.unwrap().status() })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap(), StatusCode::OK);
    }

    let cart = body_json(app.get("/api/cart", Some(&alice)).await).await;
    assert_eq!(cart.as_array().unwrap().len(), 1);
    assert_eq!(cart[0]["quantity"], ADDS);
}

#[tokio::test]
async fn unauthenticated_cart_requests_get_401_and_no_data() {
    let app = TestApp::new();
    let product_id = app.create_product("Widget", json!(9.99)).await;

    let response = app.get("/api/cart", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body, json!({ "error": "Authentication required" }));

    let response = app
        .json(
            Method::POST,
            "/api/cart",
            None,
            &json!({ "product_id": product_id }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(
        app.delete("/api/cart/clear", None).await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        app.delete("/api/cart/1", None).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn add_twice_then_view_merges_into_one_line() {
    let app = TestApp::new();
    let alice = app.user_session("alice").await;
    let widget = app.create_product("Widget", json!(9.99)).await;

    let response = app
        .json(
            Method::POST,
            "/api/cart",
            Some(&alice),
            &json!({ "product_id": widget, "quantity": 2 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Item added to cart");

    let response = app
        .json(
            Method::POST,
            "/api/cart",
            Some(&alice),
            &json!({ "product_id": widget, "quantity": 3 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get("/api/cart", Some(&alice)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cart = body_json(response).await;
    let lines = cart.as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["product"], "Widget");
    assert_eq!(lines[0]["price"], json!(9.99));
    assert_eq!(lines[0]["quantity"], 5);
    assert!(lines[0]["id"].is_i64());
}

#[tokio::test]
async fn quantity_defaults_to_one() {
    let app = TestApp::new();
    let alice = app.user_session("alice").await;
    let widget = app.create_product("Widget", json!("1.50")).await;

    app.json(
        Method::POST,
        "/api/cart",
        Some(&alice),
        &json!({ "product_id": widget }),
    )
    .await;

    let cart = body_json(app.get("/api/cart", Some(&alice)).await).await;
    assert_eq!(cart[0]["quantity"], 1);
    assert_eq!(cart[0]["price"], json!(1.5));
}

#[tokio::test]
async fn add_validation_errors() {
    let app = TestApp::new();
    let alice = app.user_session("alice").await;
    let widget = app.create_product("Widget", json!(9.99)).await;

    for body in [
        json!({}),
        json!({ "product_id": widget, "quantity": 0 }),
        json!({ "product_id": widget, "quantity": -1 }),
        json!({ "product_id": "not-a-number" }),
    ] {
        let response = app
            .json(Method::POST, "/api/cart", Some(&alice), &body)
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        assert!(body_json(response).await["error"].is_string());
    }

    let response = app
        .json(
            Method::POST,
            "/api/cart",
            Some(&alice),
            &json!({ "product_id": 999 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let cart = body_json(app.get("/api/cart", Some(&alice)).await).await;
    assert_eq!(cart, json!([]));
}

#[tokio::test]
async fn users_cannot_remove_each_others_lines() {
    let app = TestApp::new();
    let alice = app.user_session("alice").await;
    let bob = app.user_session("bob").await;
    let widget = app.create_product("Widget", json!(9.99)).await;

    app.json(
        Method::POST,
        "/api/cart",
        Some(&alice),
        &json!({ "product_id": widget }),
    )
    .await;
    let cart = body_json(app.get("/api/cart", Some(&alice)).await).await;
    let line_id = cart[0]["id"].as_i64().unwrap();

    // Bob sees none of Alice's cart.
    let bobs_cart = body_json(app.get("/api/cart", Some(&bob)).await).await;
    assert_eq!(bobs_cart, json!([]));

    let response = app
        .delete(&format!("/api/cart/{line_id}"), Some(&bob))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let cart = body_json(app.get("/api/cart", Some(&alice)).await).await;
    assert_eq!(cart.as_array().unwrap().len(), 1);

    let response = app
        .delete(&format!("/api/cart/{line_id}"), Some(&alice))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Item removed from cart");

    let cart = body_json(app.get("/api/cart", Some(&alice)).await).await;
    assert_eq!(cart, json!([]));
}

#[tokio::test]
async fn removing_unknown_line_is_404() {
    let app = TestApp::new();
    let alice = app.user_session("alice").await;

    let response = app.delete("/api/cart/12345", Some(&alice)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_line_id_is_400_with_error_body() {
    let app = TestApp::new();
    let alice = app.user_session("alice").await;

    let response = app.delete("/api/cart/abc", Some(&alice)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn clear_is_idempotent_and_not_shadowed_by_line_route() {
    let app = TestApp::new();
    let alice = app.user_session("alice").await;
    let widget = app.create_product("Widget", json!(9.99)).await;
    let gadget = app.create_product("Gadget", json!(24.5)).await;

    for product_id in [widget, gadget] {
        app.json(
            Method::POST,
            "/api/cart",
            Some(&alice),
            &json!({ "product_id": product_id }),
        )
        .await;
    }

    for _ in 0..2 {
        let response = app.delete("/api/cart/clear", Some(&alice)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["message"], "Cart cleared");
    }

    let cart = body_json(app.get("/api/cart", Some(&alice)).await).await;
    assert_eq!(cart, json!([]));
}

#[tokio::test]
async fn logout_ends_cart_access() {
    let app = TestApp::new();
    let alice = app.user_session("alice").await;
    assert_eq!(
        app.get("/api/cart", Some(&alice)).await.status(),
        StatusCode::OK
    );

    let response = app.form("/logout", Some(&alice), "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    assert_eq!(
        app.get("/api/cart", Some(&alice)).await.status(),
        StatusCode::UNAUTHORIZED
    );
}
