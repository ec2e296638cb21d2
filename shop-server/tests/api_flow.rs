//! End-to-end API tests
//!
//! Drives the full router over an in-memory database, with identity
//! supplied through the trusted x-user-* headers the way the upstream
//! gateway would.

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use shop_server::ServerState;

async fn test_app() -> Router {
    shop_server::api::router(ServerState::for_tests().await)
}

struct Identity<'a> {
    id: i64,
    name: &'a str,
    role: &'a str,
}

const ADMIN: Identity<'static> = Identity {
    id: 1,
    name: "root",
    role: "ADMIN",
};

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    identity: Option<&Identity<'_>>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(who) = identity {
        builder = builder
            .header("x-user-id", who.id.to_string())
            .header("x-user-name", who.name)
            .header("x-user-role", who.role);
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Provision a user through the admin API, returning their identity
async fn provision_user<'a>(app: &Router, name: &'a str, role: &'a str) -> Identity<'a> {
    let (status, body) = send(
        app,
        "POST",
        "/api/users",
        Some(&ADMIN),
        Some(json!({ "username": name, "role": role })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "provisioning {name}: {body}");
    Identity {
        id: body["data"]["id"].as_i64().unwrap(),
        name,
        role,
    }
}

async fn create_product(app: &Router, name: &str, price: f64) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/products",
        Some(&ADMIN),
        Some(json!({ "name": name, "price": price, "units_in_stock": 50 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "creating {name}: {body}");
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn identity_headers_are_required() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/api/basket", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);
}

#[tokio::test]
async fn basket_checkout_flow() {
    let app = test_app().await;
    let alice = provision_user(&app, "alice", "USER").await;
    let mug = create_product(&app, "Mug", 10.0).await;
    let plate = create_product(&app, "Plate", 2.5).await;

    // Empty basket to start
    let (status, body) = send(&app, "GET", "/api/basket", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].is_null());

    // Add twice: merged line, fresh aggregate
    send(
        &app,
        "POST",
        "/api/basket/items",
        Some(&alice),
        Some(json!({ "product_id": mug, "quantity": 2 })),
    )
    .await;
    let (_, body) = send(
        &app,
        "POST",
        "/api/basket/items",
        Some(&alice),
        Some(json!({ "product_id": mug, "quantity": 3 })),
    )
    .await;
    assert_eq!(body["data"]["delivery_price"], 50.0);

    send(
        &app,
        "POST",
        "/api/basket/items",
        Some(&alice),
        Some(json!({ "product_id": plate, "quantity": 4 })),
    )
    .await;

    let (_, body) = send(&app, "GET", "/api/basket", Some(&alice), None).await;
    let order_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["delivery_price"], 60.0);

    // Alice checks out her own basket
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/orders/{order_id}/status"),
        Some(&alice),
        Some(json!({ "status": "checkout" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "CHECKOUT");

    // But cannot jump to DELIVERED
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/orders/{order_id}/status"),
        Some(&alice),
        Some(json!({ "status": "DELIVERED" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 4004);

    // Admin walks it forward to DELIVERED
    for target in ["PLACED", "SHIPPED", "DELIVERED"] {
        let (status, _) = send(
            &app,
            "PUT",
            &format!("/api/orders/{order_id}/status"),
            Some(&ADMIN),
            Some(json!({ "status": target })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/orders/{order_id}"),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(body["data"]["status"], "DELIVERED");
    assert!(body["data"]["delivery_date"].is_i64());

    // A fresh add opens a new basket; the delivered order is history
    let (_, body) = send(
        &app,
        "POST",
        "/api/basket/items",
        Some(&alice),
        Some(json!({ "product_id": mug, "quantity": 1 })),
    )
    .await;
    assert_ne!(body["data"]["id"].as_i64().unwrap(), order_id);
}

#[tokio::test]
async fn unknown_status_is_bad_request() {
    let app = test_app().await;
    let alice = provision_user(&app, "alice", "USER").await;
    let mug = create_product(&app, "Mug", 10.0).await;
    let (_, body) = send(
        &app,
        "POST",
        "/api/basket/items",
        Some(&alice),
        Some(json!({ "product_id": mug, "quantity": 1 })),
    )
    .await;
    let order_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/orders/{order_id}/status"),
        Some(&ADMIN),
        Some(json!({ "status": "TELEPORTED" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4003);
}

#[tokio::test]
async fn item_quantity_floor_removes_line() {
    let app = test_app().await;
    let alice = provision_user(&app, "alice", "USER").await;
    let mug = create_product(&app, "Mug", 10.0).await;

    send(
        &app,
        "POST",
        "/api/basket/items",
        Some(&alice),
        Some(json!({ "product_id": mug, "quantity": 2 })),
    )
    .await;
    let (_, body) = send(&app, "GET", "/api/basket", Some(&alice), None).await;
    let item_id = body["data"]["items"][0]["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/basket/items/{item_id}"),
        Some(&alice),
        Some(json!({ "quantity": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/api/basket", Some(&alice), None).await;
    assert!(body["data"]["items"].as_array().unwrap().is_empty());
    assert_eq!(body["data"]["delivery_price"], 0.0);
}

#[tokio::test]
async fn foreign_basket_items_are_off_limits() {
    let app = test_app().await;
    let alice = provision_user(&app, "alice", "USER").await;
    let mallory = provision_user(&app, "mallory", "USER").await;
    let mug = create_product(&app, "Mug", 10.0).await;

    send(
        &app,
        "POST",
        "/api/basket/items",
        Some(&alice),
        Some(json!({ "product_id": mug, "quantity": 2 })),
    )
    .await;
    let (_, body) = send(&app, "GET", "/api/basket", Some(&alice), None).await;
    let item_id = body["data"]["items"][0]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/basket/items/{item_id}"),
        Some(&mallory),
        Some(json!({ "quantity": 99 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN, "{body}");
}

#[tokio::test]
async fn referenced_product_delete_conflicts() {
    let app = test_app().await;
    let alice = provision_user(&app, "alice", "USER").await;
    let mug = create_product(&app, "Mug", 10.0).await;

    send(
        &app,
        "POST",
        "/api/basket/items",
        Some(&alice),
        Some(json!({ "product_id": mug, "quantity": 1 })),
    )
    .await;

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/products/{mug}"),
        Some(&ADMIN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 6002);

    // The product is still there
    let (status, _) = send(&app, "GET", &format!("/api/products/{mug}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn catalog_mutation_requires_admin() {
    let app = test_app().await;
    let alice = provision_user(&app, "alice", "USER").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/products",
        Some(&alice),
        Some(json!({ "name": "Mug", "price": 10.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);
}

#[tokio::test]
async fn validation_rejects_before_any_mutation() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/products",
        Some(&ADMIN),
        Some(json!({ "name": "  ", "price": 10.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
    assert_eq!(body["details"]["rule"], "name-not-blank");

    let (status, _) = send(
        &app,
        "POST",
        "/api/products",
        Some(&ADMIN),
        Some(json!({ "name": "Mug", "price": -5.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was created
    let (_, body) = send(&app, "GET", "/api/products", None, None).await;
    assert_eq!(body["data"]["total"], 0);
}

#[tokio::test]
async fn favorites_roundtrip_is_idempotent() {
    let app = test_app().await;
    let alice = provision_user(&app, "alice", "USER").await;
    let mug = create_product(&app, "Mug", 10.0).await;

    for _ in 0..2 {
        let (status, _) = send(
            &app,
            "PUT",
            &format!("/api/favorites/{mug}"),
            Some(&alice),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, body) = send(&app, "GET", "/api/favorites", Some(&alice), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    for _ in 0..2 {
        let (status, _) = send(
            &app,
            "DELETE",
            &format!("/api/favorites/{mug}"),
            Some(&alice),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, body) = send(&app, "GET", "/api/favorites", Some(&alice), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn reviews_attach_to_products() {
    let app = test_app().await;
    let alice = provision_user(&app, "alice", "USER").await;
    let mug = create_product(&app, "Mug", 10.0).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/products/{mug}/reviews"),
        Some(&alice),
        Some(json!({ "rating": 5, "comment": "solid" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    // Rating outside 1..=5 is rejected up front
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/products/{mug}/reviews"),
        Some(&alice),
        Some(json!({ "rating": 6 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/products/{mug}/reviews"),
        None,
        None,
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["rating"], 5);
}

#[tokio::test]
async fn admin_reports_and_search() {
    let app = test_app().await;
    let alice = provision_user(&app, "alice", "USER").await;
    let bob = provision_user(&app, "bob", "USER").await;
    let mug = create_product(&app, "Mug", 10.0).await;

    send(
        &app,
        "POST",
        "/api/basket/items",
        Some(&alice),
        Some(json!({ "product_id": mug, "quantity": 2 })),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/basket/items",
        Some(&bob),
        Some(json!({ "product_id": mug, "quantity": 3 })),
    )
    .await;

    // Quantities sum across open baskets too
    let (status, body) = send(
        &app,
        "GET",
        "/api/orders/reports/product-quantities",
        Some(&ADMIN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["product_id"].as_i64().unwrap(), mug);
    assert_eq!(body["data"][0]["total_quantity"], 5);

    // Username search is admin-only
    let (status, body) = send(
        &app,
        "GET",
        "/api/orders/search?username=ali",
        Some(&ADMIN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["username"], "alice");

    let (status, _) = send(
        &app,
        "GET",
        "/api/orders/search?username=ali",
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
