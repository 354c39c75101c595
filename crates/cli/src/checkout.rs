//! Checkout client.
//!
//! Posts the cart to the storefront's `/api/checkout` endpoint and returns
//! the hosted session to redirect to. The cart is never modified here:
//! it is cleared only when the shopper lands on the success destination.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tracing::{info, instrument, warn};
use url::Url;

use aura_core::{Cart, CartLine, CheckoutError, CheckoutSession};

use crate::config::CliConfig;

/// Path of the checkout endpoint on the storefront.
const CHECKOUT_PATH: &str = "api/checkout";

/// JSON body sent to the storefront.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutPayload<'a> {
    items: &'a [CartLine],
    #[serde(skip_serializing_if = "Option::is_none")]
    success_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cancel_url: Option<&'a str>,
}

/// Optional redirect overrides.
#[derive(Debug, Clone, Default)]
pub struct Redirects {
    pub success_url: Option<String>,
    pub cancel_url: Option<String>,
}

/// Storefront checkout client with a single in-flight guard.
#[derive(Debug)]
pub struct CheckoutClient {
    http: reqwest::Client,
    endpoint: String,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the checkout attempt ends.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, CheckoutError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CheckoutError::InProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl CheckoutClient {
    /// Create a client for the configured storefront.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Transport`] if the HTTP client fails to build.
    pub fn new(config: &CliConfig) -> Result<Self, CheckoutError> {
        Self::with_endpoint(&config.storefront_url, config.checkout_timeout)
    }

    /// Create a client for an explicit storefront root.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Transport`] if the HTTP client fails to build.
    pub fn with_endpoint(
        storefront: &Url,
        timeout: std::time::Duration,
    ) -> Result<Self, CheckoutError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CheckoutError::Transport(e.to_string()))?;
        let endpoint = format!(
            "{}/{CHECKOUT_PATH}",
            storefront.as_str().trim_end_matches('/')
        );

        Ok(Self {
            http,
            endpoint,
            in_flight: AtomicBool::new(false),
        })
    }

    /// Whether a checkout is currently running.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Open a checkout session for `cart`.
    ///
    /// Fails fast with [`CheckoutError::EmptyCart`] before any network call,
    /// and with [`CheckoutError::InProgress`] while another call on this
    /// client is still running. Failures are not retried.
    ///
    /// # Errors
    ///
    /// Any transport error, non-success status or malformed body is
    /// returned as a retryable [`CheckoutError`].
    #[instrument(skip_all, fields(lines = cart.len(), items = cart.total_items()))]
    pub async fn start(
        &self,
        cart: &Cart,
        redirects: &Redirects,
    ) -> Result<CheckoutSession, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let _guard = InFlight::acquire(&self.in_flight)?;

        let payload = CheckoutPayload {
            items: cart.lines(),
            success_url: redirects.success_url.as_deref(),
            cancel_url: redirects.cancel_url.as_deref(),
        };

        let response = self
            .http
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Checkout request failed");
                CheckoutError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Checkout rejected by storefront");
            return Err(CheckoutError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CheckoutError::Transport(e.to_string()))?;
        let session = CheckoutSession::parse(&body).inspect_err(|e| {
            warn!(error = %e, "Unexpected checkout response");
        })?;

        info!(session_id = %session.session_id, "Checkout session opened");
        Ok(session)
    }
}
