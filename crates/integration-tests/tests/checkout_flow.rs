//! End-to-end checkout tests.
//!
//! The CLI's checkout client talks to a real storefront, which talks to a
//! mock processor. Cart state lives in a temporary data directory.

use std::time::Duration;

use aura_cli::{CheckoutClient, FileStorage, Redirects};
use aura_core::{Catalog, CheckoutError, ProductId, Store};
use aura_integration_tests::{Behavior, TEST_SECRET_KEY, TestContext};
use reqwest::StatusCode;
use serde_json::{Value, json};

fn open_store(dir: &tempfile::TempDir) -> Store<FileStorage> {
    Store::open(FileStorage::open(dir.path()).expect("Failed to open storage"))
}

fn client(ctx: &TestContext) -> CheckoutClient {
    CheckoutClient::with_endpoint(&ctx.storefront_url, Duration::from_secs(5))
        .expect("Failed to build checkout client")
}

fn fill_cart(store: &mut Store<FileStorage>) {
    let catalog = Catalog::fixture();
    store
        .add_to_cart(catalog.get(&ProductId::new("1")).expect("product 1"), 3)
        .expect("add product 1");
    store
        .add_to_cart(catalog.get(&ProductId::new("2")).expect("product 2"), 1)
        .expect("add product 2");
}

// =============================================================================
// Happy Path
// =============================================================================

#[tokio::test]
async fn test_checkout_then_success_clears_cart() {
    let ctx = TestContext::start().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open_store(&dir);
    fill_cart(&mut store);

    let session = client(&ctx)
        .start(store.cart(), &Redirects::default())
        .await
        .expect("checkout should succeed");

    assert_eq!(session.session_id, "cs_test_1");
    assert!(session.url.starts_with("https://checkout.stripe.test/"));

    // Starting checkout does not touch the cart
    assert_eq!(store.cart().total_items(), 4);
    assert_eq!(open_store(&dir).cart().total_items(), 4);

    store.confirm_checkout_success(Some(&session.session_id));
    assert!(store.cart().is_empty());
    assert!(open_store(&dir).cart().is_empty());
}

#[tokio::test]
async fn test_processor_receives_line_items_in_minor_units() {
    let ctx = TestContext::start().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open_store(&dir);
    fill_cart(&mut store);

    client(&ctx)
        .start(store.cart(), &Redirects::default())
        .await
        .expect("checkout should succeed");

    let requests = ctx.stripe.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];

    assert_eq!(
        request.authorization.as_deref(),
        Some(format!("Bearer {TEST_SECRET_KEY}").as_str())
    );
    assert_eq!(request.param("mode"), Some("payment"));
    assert_eq!(request.param("payment_method_types[0]"), Some("card"));
    assert_eq!(request.param("customer_creation"), Some("always"));
    assert_eq!(request.param("locale"), Some("pt-BR"));
    assert!(
        request
            .param("metadata[orderId]")
            .is_some_and(|id| id.starts_with("LUMA-"))
    );
    assert_eq!(
        request.param("success_url"),
        Some("http://localhost:3000/success?session_id={CHECKOUT_SESSION_ID}")
    );
    assert_eq!(
        request.param("cancel_url"),
        Some("http://localhost:3000/cancel")
    );

    assert_eq!(
        request.param("line_items[0][price_data][unit_amount]"),
        Some("8999")
    );
    assert_eq!(request.param("line_items[0][quantity]"), Some("3"));
    assert_eq!(
        request.param("line_items[1][price_data][unit_amount]"),
        Some("12999")
    );
    assert_eq!(
        request.param("line_items[1][price_data][currency]"),
        Some("brl")
    );
    assert_eq!(
        request.param("line_items[1][price_data][product_data][metadata][internalId]"),
        Some("2")
    );
    assert!(
        request
            .param("line_items[1][price_data][product_data][images][0]")
            .is_some_and(|url| url.starts_with("http://localhost:3000/"))
    );
}

#[tokio::test]
async fn test_redirect_overrides_are_forwarded() {
    let ctx = TestContext::start().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open_store(&dir);
    fill_cart(&mut store);

    let redirects = Redirects {
        success_url: Some("https://shop.example/ok?session_id={CHECKOUT_SESSION_ID}".to_string()),
        cancel_url: None,
    };
    client(&ctx)
        .start(store.cart(), &redirects)
        .await
        .expect("checkout should succeed");

    let request = &ctx.stripe.requests()[0];
    assert_eq!(
        request.param("success_url"),
        Some("https://shop.example/ok?session_id={CHECKOUT_SESSION_ID}")
    );
    assert_eq!(
        request.param("cancel_url"),
        Some("http://localhost:3000/cancel")
    );
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_empty_cart_makes_no_network_call() {
    let ctx = TestContext::start().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let store = open_store(&dir);

    let result = client(&ctx).start(store.cart(), &Redirects::default()).await;

    assert_eq!(result, Err(CheckoutError::EmptyCart));
    assert!(ctx.stripe.requests().is_empty());
}

#[tokio::test]
async fn test_processor_error_is_generic_and_keeps_cart() {
    let ctx = TestContext::start().await;
    ctx.stripe.set_behavior(Behavior::Fail(402));
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open_store(&dir);
    fill_cart(&mut store);

    let err = client(&ctx)
        .start(store.cart(), &Redirects::default())
        .await
        .expect_err("checkout should fail");

    assert_eq!(err, CheckoutError::Status(502));
    assert!(err.is_retryable());
    assert_eq!(store.cart().total_items(), 4);
}

#[tokio::test]
async fn test_session_without_url_is_a_failure() {
    let ctx = TestContext::start().await;
    ctx.stripe.set_behavior(Behavior::OmitUrl);
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open_store(&dir);
    fill_cart(&mut store);

    let err = client(&ctx)
        .start(store.cart(), &Redirects::default())
        .await
        .expect_err("checkout should fail");

    assert_eq!(err, CheckoutError::Status(502));
}

#[tokio::test]
async fn test_unreachable_storefront_is_transport_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open_store(&dir);
    fill_cart(&mut store);

    // Bind then drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = CheckoutClient::with_endpoint(
        &url::Url::parse(&format!("http://{addr}")).expect("url"),
        Duration::from_secs(2),
    )
    .expect("client");
    let err = client
        .start(store.cart(), &Redirects::default())
        .await
        .expect_err("checkout should fail");

    assert!(matches!(err, CheckoutError::Transport(_)));
    assert_eq!(
        err.user_message(),
        "We couldn't process your payment. Please try again."
    );
    assert_eq!(store.cart().total_items(), 4);
}

#[tokio::test]
async fn test_slow_checkout_times_out() {
    let ctx = TestContext::start().await;
    ctx.stripe.set_behavior(Behavior::Delay(Duration::from_secs(3)));
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open_store(&dir);
    fill_cart(&mut store);

    let client = CheckoutClient::with_endpoint(&ctx.storefront_url, Duration::from_millis(500))
        .expect("client");
    let err = client
        .start(store.cart(), &Redirects::default())
        .await
        .expect_err("checkout should time out");

    assert!(matches!(err, CheckoutError::Transport(_)));
    assert!(!client.is_in_flight());
}

#[tokio::test]
async fn test_concurrent_checkout_is_rejected() {
    let ctx = TestContext::start().await;
    ctx.stripe
        .set_behavior(Behavior::Delay(Duration::from_millis(500)));
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open_store(&dir);
    fill_cart(&mut store);
    let client = client(&ctx);
    let redirects = Redirects::default();

    let (first, second) = tokio::join!(
        client.start(store.cart(), &redirects),
        async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            client.start(store.cart(), &Redirects::default()).await
        }
    );

    assert!(first.is_ok());
    assert_eq!(second, Err(CheckoutError::InProgress));
    assert_eq!(ctx.stripe.requests().len(), 1);

    // The guard is released once the first call finishes
    assert!(!client.is_in_flight());
}

// =============================================================================
// Storefront API contract
// =============================================================================

#[tokio::test]
async fn test_checkout_api_rejects_empty_items() {
    let ctx = TestContext::start().await;

    let response = ctx
        .client
        .post(ctx.url("/api/checkout"))
        .json(&json!({"items": []}))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["error"], "No items provided");
    assert!(ctx.stripe.requests().is_empty());
}

#[tokio::test]
async fn test_checkout_api_reprices_from_catalog() {
    let ctx = TestContext::start().await;
    let mut product = serde_json::to_value(
        Catalog::fixture()
            .get(&ProductId::new("2"))
            .expect("product 2"),
    )
    .expect("serialize product");
    product["price"] = json!("0.01");

    let response = ctx
        .client
        .post(ctx.url("/api/checkout"))
        .json(&json!({"items": [{"product": product, "quantity": 1}]}))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["sessionId"], "cs_test_1");
    assert_eq!(
        ctx.stripe.requests()[0].param("line_items[0][price_data][unit_amount]"),
        Some("12999")
    );
}

#[tokio::test]
async fn test_checkout_api_processor_failure() {
    let ctx = TestContext::start().await;
    ctx.stripe.set_behavior(Behavior::Fail(500));
    let product = serde_json::to_value(
        Catalog::fixture()
            .get(&ProductId::new("3"))
            .expect("product 3"),
    )
    .expect("serialize product");

    let response = ctx
        .client
        .post(ctx.url("/api/checkout"))
        .json(&json!({"items": [{"product": product, "quantity": 2}]}))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["error"], "Failed to create checkout session");
}
