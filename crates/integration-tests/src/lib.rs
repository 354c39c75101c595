//! Integration test harness for Aura.
//!
//! Starts real servers on ephemeral ports:
//! - a mock of the processor's checkout session endpoint, which records
//!   every request and answers according to a configurable [`Behavior`]
//! - the storefront router, configured to talk to that mock
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p aura-integration-tests
//! ```
//!
//! No external services or credentials are required.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use aura_core::{Catalog, CurrencyCode};
use aura_storefront::config::{StorefrontConfig, StripeConfig};
use aura_storefront::state::AppState;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Form, Json, Router};
use secrecy::SecretString;
use serde_json::json;
use url::Url;

/// Secret key the storefront under test is configured with.
pub const TEST_SECRET_KEY: &str = "sk_test_4eC39HqLyjWDarjtT1zdp7dc";

/// How the mock processor answers session requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// `200` with a session ID and URL.
    Succeed,
    /// The given status with a Stripe-style error body.
    Fail(u16),
    /// `200` with a session that has no URL.
    OmitUrl,
    /// Succeed after sleeping this long.
    Delay(Duration),
}

/// A request received by the mock processor.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub authorization: Option<String>,
    pub params: Vec<(String, String)>,
}

impl RecordedRequest {
    /// First value submitted under `key`.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug)]
struct MockState {
    behavior: Mutex<Behavior>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Handle to a running mock processor.
#[derive(Debug, Clone)]
pub struct MockStripe {
    pub url: Url,
    state: Arc<MockState>,
}

impl MockStripe {
    /// Start the mock on an ephemeral port.
    pub async fn start() -> Self {
        let state = Arc::new(MockState {
            behavior: Mutex::new(Behavior::Succeed),
            requests: Mutex::new(Vec::new()),
        });

        let router = Router::new()
            .route("/v1/checkout/sessions", post(create_session))
            .with_state(Arc::clone(&state));
        let addr = serve(router).await;

        Self {
            url: Url::parse(&format!("http://{addr}")).expect("Failed to build mock URL"),
            state,
        }
    }

    /// Change how subsequent requests are answered.
    pub fn set_behavior(&self, behavior: Behavior) {
        *self.state.behavior.lock().expect("Mock state poisoned") = behavior;
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .expect("Mock state poisoned")
            .clone()
    }
}

async fn create_session(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Form(params): Form<Vec<(String, String)>>,
) -> Response {
    let behavior = *state.behavior.lock().expect("Mock state poisoned");
    let number = {
        let mut requests = state.requests.lock().expect("Mock state poisoned");
        requests.push(RecordedRequest {
            authorization: headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(String::from),
            params,
        });
        requests.len()
    };

    let id = format!("cs_test_{number}");
    let url = format!("https://checkout.stripe.test/c/pay/{id}");

    match behavior {
        Behavior::Succeed => Json(json!({"id": id, "object": "checkout.session", "url": url}))
            .into_response(),
        Behavior::Delay(delay) => {
            tokio::time::sleep(delay).await;
            Json(json!({"id": id, "object": "checkout.session", "url": url})).into_response()
        }
        Behavior::OmitUrl => {
            Json(json!({"id": id, "object": "checkout.session", "url": null})).into_response()
        }
        Behavior::Fail(status) => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Json(json!({"error": {"type": "api_error", "message": "Mock failure"}})),
        )
            .into_response(),
    }
}

/// A running storefront wired to a mock processor.
#[derive(Debug, Clone)]
pub struct TestContext {
    pub client: reqwest::Client,
    pub storefront_url: Url,
    pub stripe: MockStripe,
}

impl TestContext {
    /// Start the mock processor and a storefront pointed at it.
    pub async fn start() -> Self {
        let stripe = MockStripe::start().await;
        let config = storefront_config(&stripe.url);
        let state =
            AppState::new(config, Catalog::fixture()).expect("Failed to build storefront state");
        let addr = serve(aura_storefront::app(state)).await;

        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            storefront_url: Url::parse(&format!("http://{addr}"))
                .expect("Failed to build storefront URL"),
            stripe,
        }
    }

    /// Absolute URL of a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.storefront_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Storefront configuration for tests.
#[must_use]
pub fn storefront_config(stripe_api_base: &Url) -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().expect("Invalid loopback address"),
        port: 0,
        base_url: Url::parse("http://localhost:3000").expect("Invalid base URL"),
        stripe: StripeConfig {
            secret_key: SecretString::from(TEST_SECRET_KEY),
            api_base: stripe_api_base.clone(),
            timeout: Duration::from_secs(5),
        },
        currency: CurrencyCode::BRL,
        locale: "pt-BR".to_string(),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Serve `router` on an ephemeral loopback port.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind ephemeral port");
    let addr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server error");
    });

    addr
}
