//! Menu pages, the waiter page and the ambient endpoints.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use usuba_integration_tests::{TestApp, VENUE_NAME};

#[tokio::test]
async fn test_index_lists_menus_in_order() {
    let mut app = TestApp::new();
    let response = app.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    let food = response.body.find("/menu/food").unwrap();
    let drinks = response.body.find("/menu/drinks").unwrap();
    assert!(food < drinks);
    assert!(response.body.contains(VENUE_NAME));
}

#[tokio::test]
async fn test_menu_page() {
    let mut app = TestApp::new();
    let response = app.get("/menu/food").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Food Menu"));
    assert!(response.body.contains("Two pieces per order."));
    assert!(response.body.contains("Nigiri"));
    assert!(response.body.contains(r#"id="item-1-0""#));
    assert!(response.body.contains(r#"id="cart-widget""#));
    assert!(response.body.contains("Your order is empty"));
    assert!(!response.body.contains("cart-item-added"));
}

#[tokio::test]
async fn test_drinks_page_uses_drink_markup() {
    let mut app = TestApp::new();
    let response = app.get("/menu/drinks").await;

    assert!(response.body.contains("drink-menu"));
    assert!(response.body.contains("drink-item"));
    assert!(response.body.contains("Junmai Daiginjo"));
}

#[tokio::test]
async fn test_added_marker_matches_by_name() {
    let mut app = TestApp::new();
    app.post_htmx("/cart/add", "menu=drinks&section=0&item=0")
        .await;

    let response = app.get("/menu/drinks").await;
    assert_eq!(response.body.matches("cart-item-added").count(), 1);
    // Plain page render, no flash
    assert!(!response.body.contains("cart-flash"));
}

#[tokio::test]
async fn test_unknown_menu_is_not_found() {
    let mut app = TestApp::new();
    let response = app.get("/menu/lunch").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_waiter_page() {
    let mut app = TestApp::new();
    app.post_htmx("/cart/add", "menu=food&section=0&item=0").await;
    app.post_htmx("/cart/add", "menu=food&section=0&item=0").await;

    let response = app.get("/waiter").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Order Summary"));
    assert!(response.body.contains("2 items"));
    assert!(response.body.contains("× 2 · 6 each"));
    assert!(
        response
            .body
            .contains(r#"<img class="waiter-item-image" src="/static/images/salmon.jpg""#)
    );
    assert!(response.body.contains("Total"));
    assert!(response.body.contains(VENUE_NAME));
}

#[tokio::test]
async fn test_item_names_are_escaped() {
    let mut app = TestApp::new();
    app.put_json(
        "/api/cart",
        r#"[{"name": "<img src=x onerror=alert(1)>", "price": 4, "qty": 1, "image": ""}]"#,
    )
    .await;

    let response = app.get("/waiter").await;
    assert!(!response.body.contains("<img src=x"));
}

#[tokio::test]
async fn test_health() {
    let mut app = TestApp::new();
    let response = app.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");
}

#[tokio::test]
async fn test_response_headers() {
    let mut app = TestApp::new();
    let response = app.get("/").await;

    assert!(response.header("x-request-id").is_some());
    assert_eq!(response.header("x-frame-options"), Some("DENY"));
    assert!(
        response
            .header("content-security-policy")
            .unwrap()
            .contains("default-src 'none'")
    );
}
