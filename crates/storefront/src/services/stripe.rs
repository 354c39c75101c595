//! Stripe API client for hosted checkout sessions.
//!
//! Only one endpoint is used: `POST /v1/checkout/sessions`. Stripe takes
//! form-encoded bodies with bracketed keys for nested fields, so the
//! [`CheckoutRequest`] is flattened by [`form_params`] rather than sent as
//! JSON.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use aura_core::{CheckoutRequest, CheckoutSession};

use crate::config::StripeConfig;

/// Stripe API version pinned for every request.
const API_VERSION: &str = "2025-09-30.clover";

/// Path of the checkout session endpoint, relative to the API base.
const SESSIONS_PATH: &str = "v1/checkout/sessions";

/// Longest error body kept from a failed response.
const MAX_ERROR_MESSAGE_LEN: usize = 512;

/// Errors that can occur when interacting with the Stripe API.
#[derive(Debug, Error)]
pub enum StripeError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Stripe API client.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    sessions_url: String,
}

impl StripeClient {
    /// Create a new Stripe API client.
    ///
    /// # Errors
    ///
    /// Returns error if the key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &StripeConfig) -> Result<Self, StripeError> {
        let mut headers = HeaderMap::new();

        let mut auth_value =
            HeaderValue::from_str(&format!("Bearer {}", config.secret_key.expose_secret()))
                .map_err(|e| StripeError::Parse(format!("Invalid API key format: {e}")))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert("Stripe-Version", HeaderValue::from_static(API_VERSION));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let sessions_url = format!(
            "{}/{SESSIONS_PATH}",
            config.api_base.as_str().trim_end_matches('/')
        );

        Ok(Self {
            client,
            sessions_url,
        })
    }

    /// Open a hosted checkout session.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, Stripe rejects it, or the
    /// response carries no redirect URL.
    #[instrument(
        skip_all,
        fields(
            order_id = %request.order_id,
            line_items = request.line_items.len(),
            amount_total = request.amount_total()
        )
    )]
    pub async fn create_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, StripeError> {
        let response = self
            .client
            .post(&self.sessions_url)
            .form(&form_params(request))
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StripeError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| StripeError::Parse(e.to_string()))?;
        let url = session
            .url
            .ok_or_else(|| StripeError::Parse("session has no url".to_string()))?;

        tracing::info!(session_id = %session.id, "Checkout session created");

        CheckoutSession {
            session_id: session.id,
            url,
        }
        .validate()
        .map_err(|e| StripeError::Parse(e.to_string()))
    }
}

/// Flatten a checkout request into Stripe's bracketed form keys.
#[must_use]
pub fn form_params(request: &CheckoutRequest) -> Vec<(String, String)> {
    let currency = request.currency.processor_code();
    let mut params = vec![
        ("mode".to_string(), "payment".to_string()),
        ("payment_method_types[0]".to_string(), "card".to_string()),
        ("customer_creation".to_string(), "always".to_string()),
        ("locale".to_string(), request.locale.clone()),
        ("success_url".to_string(), request.success_url.clone()),
        ("cancel_url".to_string(), request.cancel_url.clone()),
        ("metadata[orderId]".to_string(), request.order_id.to_string()),
    ];

    for (i, item) in request.line_items.iter().enumerate() {
        let price = format!("line_items[{i}][price_data]");
        let product = format!("{price}[product_data]");

        params.push((format!("{price}[currency]"), currency.clone()));
        params.push((format!("{price}[unit_amount]"), item.unit_amount.to_string()));
        params.push((format!("{product}[name]"), item.name.clone()));
        if !item.description.is_empty() {
            params.push((format!("{product}[description]"), item.description.clone()));
        }
        for (j, image) in item.images.iter().enumerate() {
            params.push((format!("{product}[images][{j}]"), image.clone()));
        }
        params.push((
            format!("{product}[metadata][internalId]"),
            item.metadata.internal_id.to_string(),
        ));
        if let Some(external) = &item.metadata.external_product_id {
            params.push((
                format!("{product}[metadata][externalProductId]"),
                external.clone(),
            ));
        }
        params.push((format!("line_items[{i}][quantity]"), item.quantity.to_string()));
    }

    params
}

/// Subset of Stripe's checkout session object.
#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: Option<String>,
}

/// Stripe error envelope: `{"error": {"message": "..."}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// Best human-readable message from an error body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .unwrap_or_else(|| body.chars().take(MAX_ERROR_MESSAGE_LEN).collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use aura_core::{Cart, Catalog, CheckoutSettings, OrderReference, ProductId};
    use url::Url;

    use super::*;

    fn request() -> CheckoutRequest {
        let catalog = Catalog::fixture();
        let mut cart = Cart::new();
        cart.add(catalog.get(&ProductId::new("1")).unwrap(), 2)
            .unwrap();
        cart.add_one(catalog.get(&ProductId::new("2")).unwrap())
            .unwrap();

        let settings = CheckoutSettings::new(Url::parse("https://aura.example.com").unwrap());
        CheckoutRequest::build(&cart, &settings, OrderReference::now()).unwrap()
    }

    #[test]
    fn test_form_params_session_fields() {
        let request = request();
        let params: HashMap<_, _> = form_params(&request).into_iter().collect();

        assert_eq!(params["mode"], "payment");
        assert_eq!(params["payment_method_types[0]"], "card");
        assert_eq!(params["customer_creation"], "always");
        assert_eq!(params["locale"], "pt-BR");
        assert_eq!(params["metadata[orderId]"], request.order_id.as_str());
        assert!(params["success_url"].ends_with("session_id={CHECKOUT_SESSION_ID}"));
    }

    #[test]
    fn test_form_params_line_items() {
        let request = request();
        let params: HashMap<_, _> = form_params(&request).into_iter().collect();

        assert_eq!(params["line_items[0][price_data][currency]"], "brl");
        assert_eq!(params["line_items[0][quantity]"], "2");
        assert_eq!(params["line_items[1][quantity]"], "1");
        assert_eq!(
            params["line_items[1][price_data][unit_amount]"],
            request.line_items[1].unit_amount.to_string()
        );
        assert_eq!(
            params["line_items[0][price_data][product_data][metadata][internalId]"],
            "1"
        );
        assert!(
            params["line_items[0][price_data][product_data][images][0]"]
                .starts_with("https://aura.example.com/")
        );
    }

    #[test]
    fn test_error_message_prefers_stripe_envelope() {
        let body = r#"{"error":{"message":"Invalid API Key provided","type":"invalid_request_error"}}"#;
        assert_eq!(error_message(body), "Invalid API Key provided");
        assert_eq!(error_message("upstream timeout"), "upstream timeout");
    }
}
