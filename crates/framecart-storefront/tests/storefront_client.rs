//! Integration tests for `StorefrontClient`.
//!
//! Uses `wiremock` to stand up a local GraphQL endpoint for each test so no
//! real network traffic is made. Tests cover the happy path of every cart
//! operation and each error variant the client can propagate.

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use framecart_storefront::{CartLineInput, StorefrontClient, StorefrontError};

const API_PATH: &str = "/api/2025-01/graphql.json";

/// Builds a client pointed at a mock server: 5-second timeout, test token.
fn test_client(server: &MockServer) -> StorefrontClient {
    StorefrontClient::new(&server.uri(), "test-token", "2025-01", 5)
        .expect("failed to build test StorefrontClient")
}

/// Minimal valid cart JSON with one frame line.
fn cart_json(cart_id: &str) -> serde_json::Value {
    json!({
        "id": cart_id,
        "checkoutUrl": format!("https://checkout.example.com/{cart_id}"),
        "cost": { "totalAmount": { "amount": "129.00", "currencyCode": "GBP" } },
        "lines": { "edges": [{ "node": {
            "id": "gid://shopify/CartLine/1",
            "quantity": 1,
            "merchandise": {
                "id": "gid://shopify/ProductVariant/42",
                "title": "Tortoise",
                "price": { "amount": "89.00", "currencyCode": "GBP" },
                "product": { "title": "Hartley Frame" }
            },
            "attributes": [{ "key": "Colour", "value": "Tortoise" }]
        }}]}
    })
}

fn one_line() -> Vec<CartLineInput> {
    vec![CartLineInput::new("gid://shopify/ProductVariant/42", 1)]
}

// ---------------------------------------------------------------------------
// Test 1 – cartCreate happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_cart_returns_cart_and_sends_access_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(API_PATH))
        .and(header("X-Shopify-Storefront-Access-Token", "test-token"))
        .and(body_string_contains("cartCreate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "data": { "cartCreate": { "cart": cart_json("gid://shopify/Cart/new"), "userErrors": [] } }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let cart = client
        .create_cart(&one_line())
        .await
        .expect("expected cartCreate to succeed");

    assert_eq!(cart.id, "gid://shopify/Cart/new");
    assert_eq!(cart.line_nodes().count(), 1);
    assert_eq!(
        cart.checkout_url,
        "https://checkout.example.com/gid://shopify/Cart/new"
    );
}

// ---------------------------------------------------------------------------
// Test 2 – cartLinesAdd happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_lines_returns_updated_cart() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(API_PATH))
        .and(body_string_contains("cartLinesAdd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "data": { "cartLinesAdd": { "cart": cart_json("gid://shopify/Cart/existing"), "userErrors": [] } }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let cart = client
        .add_lines("gid://shopify/Cart/existing", &one_line())
        .await
        .expect("expected cartLinesAdd to succeed");

    assert_eq!(cart.id, "gid://shopify/Cart/existing");
}

// ---------------------------------------------------------------------------
// Test 3 – user errors propagate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_lines_propagates_user_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "data": { "cartLinesAdd": { "cart": null, "userErrors": [
                { "field": ["cartId"], "message": "The specified cart does not exist." }
            ]}}
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client
        .add_lines("gid://shopify/Cart/stale", &one_line())
        .await;

    match result.expect_err("expected Err for userErrors payload") {
        StorefrontError::UserErrors { messages, .. } => {
            assert_eq!(messages, vec!["The specified cart does not exist."]);
        }
        other => panic!("expected StorefrontError::UserErrors, got: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test 4 – top-level GraphQL errors propagate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn graphql_errors_propagate_with_messages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "errors": [{ "message": "Field 'cart' doesn't exist" }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client.fetch_cart("gid://shopify/Cart/abc").await;

    match result.expect_err("expected Err for GraphQL errors") {
        StorefrontError::Graphql { messages, .. } => {
            assert_eq!(messages, vec!["Field 'cart' doesn't exist"]);
        }
        other => panic!("expected StorefrontError::Graphql, got: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test 5 – null cart on fetch is CartNotFound
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_cart_maps_null_cart_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "data": { "cart": null }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client.fetch_cart("gid://shopify/Cart/expired").await;

    assert!(
        matches!(result, Err(StorefrontError::CartNotFound)),
        "expected CartNotFound, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Test 6 – non-2xx status propagation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_success_status_is_typed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client.fetch_cart("gid://shopify/Cart/abc").await;

    match result.expect_err("expected Err for 502 response") {
        StorefrontError::UnexpectedStatus { status, .. } => assert_eq!(status, 502),
        other => panic!("expected StorefrontError::UnexpectedStatus, got: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test 7 – malformed JSON propagation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("this is not json"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client.fetch_cart("gid://shopify/Cart/abc").await;

    assert!(
        matches!(result, Err(StorefrontError::Deserialize { .. })),
        "expected Deserialize error, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Test 8 – cartLinesRemove sends every id in one call
// ---------------------------------------------------------------------------

#[tokio::test]
async fn remove_lines_sends_all_ids_in_one_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(API_PATH))
        .and(body_string_contains("cartLinesRemove"))
        .and(body_string_contains("gid://shopify/CartLine/1"))
        .and(body_string_contains("gid://shopify/CartLine/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "data": { "cartLinesRemove": { "cart": cart_json("gid://shopify/Cart/after"), "userErrors": [] } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let cart = client
        .remove_lines(
            "gid://shopify/Cart/after",
            &[
                "gid://shopify/CartLine/1".to_string(),
                "gid://shopify/CartLine/2".to_string(),
            ],
        )
        .await
        .expect("expected cartLinesRemove to succeed");

    assert_eq!(cart.id, "gid://shopify/Cart/after");
}

// ---------------------------------------------------------------------------
// Test 9 – cartLinesUpdate happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_lines_returns_updated_cart() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(API_PATH))
        .and(body_string_contains("cartLinesUpdate"))
        .and(body_string_contains("gid://shopify/CartLine/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "data": { "cartLinesUpdate": { "cart": cart_json("gid://shopify/Cart/updated"), "userErrors": [] } }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let cart = client
        .update_lines(
            "gid://shopify/Cart/updated",
            &[framecart_storefront::CartLineUpdateInput {
                id: "gid://shopify/CartLine/1".to_string(),
                quantity: 2,
            }],
        )
        .await
        .expect("expected cartLinesUpdate to succeed");

    assert_eq!(cart.id, "gid://shopify/Cart/updated");
}

// ---------------------------------------------------------------------------
// Test 10 – invalid domain is rejected at construction
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_domain_is_rejected() {
    let result = StorefrontClient::new("   ", "token", "2025-01", 5);
    assert!(
        matches!(result, Err(StorefrontError::InvalidDomain { .. })),
        "expected InvalidDomain"
    );
}
