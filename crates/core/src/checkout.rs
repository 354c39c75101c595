//! Checkout request builder.
//!
//! Turns a [`Cart`] into the line-item payload a hosted payment processor
//! expects, and interprets the processor's `{sessionId, url}` answer. This
//! module does no I/O: the HTTP call lives with whoever owns the network
//! client.
//!
//! Starting a checkout never clears the cart. Only arrival at the success
//! destination does (see [`crate::Store::confirm_checkout_success`]).

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::cart::Cart;
use crate::types::{CurrencyCode, ProductId, to_minor_units};

/// Placeholder the processor replaces with the real session ID on redirect.
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Prefix of every order reference.
pub const ORDER_PREFIX: &str = "LUMA";

/// Default checkout locale.
pub const DEFAULT_LOCALE: &str = "pt-BR";

/// Checkout failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// Nothing to check out.
    #[error("cart is empty")]
    EmptyCart,

    /// A price cannot be expressed in minor units.
    #[error("price of product {0} cannot be converted to minor units")]
    InvalidAmount(ProductId),

    /// An image path could not be resolved to an absolute URL.
    #[error("invalid image URL: {0}")]
    InvalidImage(String),

    /// A redirect override is not an absolute http(s) URL.
    #[error("invalid redirect URL: {0}")]
    InvalidRedirect(String),

    /// Another checkout from this client has not finished yet.
    #[error("a checkout is already in progress")]
    InProgress,

    /// The request never got a response.
    #[error("checkout transport error: {0}")]
    Transport(String),

    /// The processor answered with a non-success status.
    #[error("checkout failed with status {0}")]
    Status(u16),

    /// The processor answered with something other than a session.
    #[error("malformed checkout response: {0}")]
    MalformedResponse(String),
}

impl CheckoutError {
    /// Whether the same checkout may succeed if attempted again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Status(_) | Self::MalformedResponse(_)
        )
    }

    /// Message suitable for showing to the shopper.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyCart => "Your cart is empty.",
            Self::InProgress => "Your checkout is already being processed.",
            _ => "We couldn't process your payment. Please try again.",
        }
    }
}

/// Store-level checkout configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSettings {
    /// Public base URL of the storefront, used for images and redirects.
    pub base_url: Url,
    /// Single market currency for every line item.
    pub currency: CurrencyCode,
    /// Locale of the hosted checkout page.
    pub locale: String,
}

impl CheckoutSettings {
    /// Settings with the default currency and locale.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            currency: CurrencyCode::default(),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }

    fn base(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Default success destination, carrying the session ID placeholder.
    #[must_use]
    pub fn success_url(&self) -> String {
        format!("{}/success?session_id={SESSION_ID_PLACEHOLDER}", self.base())
    }

    /// Default cancel destination.
    #[must_use]
    pub fn cancel_url(&self) -> String {
        format!("{}/cancel", self.base())
    }

    /// Resolve a product image to an absolute URL.
    ///
    /// Absolute http(s) URLs pass through; anything else is treated as a
    /// path under the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidImage`] if no valid URL results.
    pub fn resolve_image(&self, image: &str) -> Result<String, CheckoutError> {
        if let Ok(url) = Url::parse(image)
            && matches!(url.scheme(), "http" | "https")
        {
            return Ok(url.to_string());
        }

        let joined = format!("{}/{}", self.base(), image.trim_start_matches('/'));
        Url::parse(&joined)
            .map(String::from)
            .map_err(|_| CheckoutError::InvalidImage(image.to_string()))
    }
}

/// Correlation tag attached to a checkout request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderReference(String);

impl OrderReference {
    /// Reference derived from the current time.
    #[must_use]
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    /// Reference derived from `time`.
    #[must_use]
    pub fn at(time: DateTime<Utc>) -> Self {
        Self(format!("{ORDER_PREFIX}-{}", time.timestamp_millis()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifiers carried alongside a line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemMetadata {
    /// Catalog product ID.
    pub internal_id: ProductId,
    /// Processor-side product ID, if the product has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_product_id: Option<String>,
}

/// One line of a checkout request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLineItem {
    pub name: String,
    pub description: String,
    /// Exactly one absolute image URL.
    pub images: Vec<String>,
    pub metadata: LineItemMetadata,
    /// Unit price in minor units.
    pub unit_amount: i64,
    pub quantity: u32,
}

/// Everything the processor needs to open a checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub line_items: Vec<CheckoutLineItem>,
    pub currency: CurrencyCode,
    pub locale: String,
    pub success_url: String,
    pub cancel_url: String,
    pub order_id: OrderReference,
}

impl CheckoutRequest {
    /// Build a request from the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] for an empty cart, or a
    /// conversion error if a price or image cannot be encoded.
    pub fn build(
        cart: &Cart,
        settings: &CheckoutSettings,
        order_id: OrderReference,
    ) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let line_items = cart
            .lines()
            .iter()
            .map(|line| {
                let product = &line.product;
                let unit_amount = to_minor_units(product.price)
                    .ok_or_else(|| CheckoutError::InvalidAmount(product.id.clone()))?;

                Ok(CheckoutLineItem {
                    name: product.name.clone(),
                    description: product.description.clone(),
                    images: vec![settings.resolve_image(&product.image)?],
                    metadata: LineItemMetadata {
                        internal_id: product.id.clone(),
                        external_product_id: product.stripe_product_id.clone(),
                    },
                    unit_amount,
                    quantity: line.quantity,
                })
            })
            .collect::<Result<Vec<_>, CheckoutError>>()?;

        Ok(Self {
            line_items,
            currency: settings.currency,
            locale: settings.locale.clone(),
            success_url: settings.success_url(),
            cancel_url: settings.cancel_url(),
            order_id,
        })
    }

    /// Replace the default redirect destinations.
    ///
    /// `None` keeps the default. Overrides are kept verbatim so the session
    /// ID placeholder survives.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidRedirect`] if an override is not an
    /// absolute http(s) URL.
    pub fn with_redirects(
        mut self,
        success_url: Option<String>,
        cancel_url: Option<String>,
    ) -> Result<Self, CheckoutError> {
        if let Some(url) = success_url {
            self.success_url = validate_redirect(url)?;
        }
        if let Some(url) = cancel_url {
            self.cancel_url = validate_redirect(url)?;
        }
        Ok(self)
    }

    /// Sum of unit amount times quantity, in minor units.
    #[must_use]
    pub fn amount_total(&self) -> i64 {
        self.line_items
            .iter()
            .map(|item| item.unit_amount.saturating_mul(i64::from(item.quantity)))
            .fold(0, i64::saturating_add)
    }
}

fn validate_redirect(url: String) -> Result<String, CheckoutError> {
    match Url::parse(&url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(url),
        _ => Err(CheckoutError::InvalidRedirect(url)),
    }
}

/// A processor-issued checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    pub session_id: String,
    /// Hosted checkout page to send the shopper to.
    pub url: String,
}

impl CheckoutSession {
    /// Interpret a `{sessionId, url}` response body.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MalformedResponse`] for any other shape,
    /// an empty session ID, or a URL that does not parse.
    pub fn parse(body: &str) -> Result<Self, CheckoutError> {
        let session: Self = serde_json::from_str(body)
            .map_err(|e| CheckoutError::MalformedResponse(e.to_string()))?;
        session.validate()
    }

    /// Check that both fields are usable.
    ///
    /// # Errors
    ///
    /// See [`CheckoutSession::parse`].
    pub fn validate(self) -> Result<Self, CheckoutError> {
        if self.session_id.trim().is_empty() {
            return Err(CheckoutError::MalformedResponse(
                "empty session id".to_string(),
            ));
        }
        Url::parse(&self.url)
            .map_err(|e| CheckoutError::MalformedResponse(format!("invalid url: {e}")))?;
        Ok(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::product::tests::product;

    fn settings() -> CheckoutSettings {
        CheckoutSettings::new(Url::parse("https://aura.example.com/").unwrap())
    }

    fn order() -> OrderReference {
        OrderReference::at(Utc.timestamp_millis_opt(1_700_000_000_000).unwrap())
    }

    #[test]
    fn test_empty_cart_rejected() {
        let result = CheckoutRequest::build(&Cart::new(), &settings(), order());
        assert_eq!(result, Err(CheckoutError::EmptyCart));
    }

    #[test]
    fn test_unit_amount_in_minor_units() {
        let mut cart = Cart::new();
        cart.add(&product("2", Decimal::new(12999, 2)), 1).unwrap();

        let request = CheckoutRequest::build(&cart, &settings(), order()).unwrap();

        assert_eq!(request.line_items.len(), 1);
        assert_eq!(request.line_items[0].unit_amount, 12999);
        assert_eq!(request.line_items[0].quantity, 1);
    }

    #[test]
    fn test_line_item_fields() {
        let mut p = product("1", Decimal::new(8999, 2));
        p.stripe_product_id = Some("prod_abc".to_string());
        let mut cart = Cart::new();
        cart.add(&p, 3).unwrap();

        let request = CheckoutRequest::build(&cart, &settings(), order()).unwrap();
        let item = &request.line_items[0];

        assert_eq!(item.name, p.name);
        assert_eq!(item.description, p.description);
        assert_eq!(item.images, ["https://aura.example.com/product-1.png"]);
        assert_eq!(item.metadata.internal_id, p.id);
        assert_eq!(item.metadata.external_product_id.as_deref(), Some("prod_abc"));
        assert_eq!(item.quantity, 3);
        assert_eq!(request.amount_total(), 26997);
        assert_eq!(request.currency, CurrencyCode::BRL);
        assert_eq!(request.locale, "pt-BR");
        assert_eq!(request.order_id.as_str(), "LUMA-1700000000000");
    }

    #[test]
    fn test_default_redirects_keep_placeholder() {
        let s = settings();
        assert_eq!(
            s.success_url(),
            "https://aura.example.com/success?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(s.cancel_url(), "https://aura.example.com/cancel");
    }

    #[test]
    fn test_redirect_overrides() {
        let mut cart = Cart::new();
        cart.add_one(&product("1", Decimal::ONE)).unwrap();
        let request = CheckoutRequest::build(&cart, &settings(), order()).unwrap();

        let custom = request
            .clone()
            .with_redirects(
                Some("http://localhost:3000/success?session_id={CHECKOUT_SESSION_ID}".to_string()),
                None,
            )
            .unwrap();
        assert!(custom.success_url.ends_with("{CHECKOUT_SESSION_ID}"));
        assert_eq!(custom.cancel_url, request.cancel_url);

        let bad = request.with_redirects(None, Some("javascript:alert(1)".to_string()));
        assert!(matches!(bad, Err(CheckoutError::InvalidRedirect(_))));
    }

    #[test]
    fn test_resolve_image() {
        let s = settings();
        assert_eq!(
            s.resolve_image("https://cdn.example.com/a.png").unwrap(),
            "https://cdn.example.com/a.png"
        );
        assert_eq!(
            s.resolve_image("/a.png").unwrap(),
            "https://aura.example.com/a.png"
        );
        assert_eq!(
            s.resolve_image("/clutch-elegante- em-couro.png").unwrap(),
            "https://aura.example.com/clutch-elegante-%20em-couro.png"
        );
    }

    #[test]
    fn test_resolve_image_keeps_base_path() {
        let s = CheckoutSettings::new(Url::parse("https://example.com/shop").unwrap());
        assert_eq!(
            s.resolve_image("/a.png").unwrap(),
            "https://example.com/shop/a.png"
        );
    }

    #[test]
    fn test_session_parse() {
        let session =
            CheckoutSession::parse(r#"{"sessionId":"cs_test_1","url":"https://pay.example/c/1"}"#)
                .unwrap();
        assert_eq!(session.session_id, "cs_test_1");
        assert_eq!(session.url, "https://pay.example/c/1");
    }

    #[test]
    fn test_session_parse_rejects_other_shapes() {
        for body in [
            r#"{"error":"Failed to create checkout session"}"#,
            r#"{"sessionId":"","url":"https://pay.example"}"#,
            r#"{"sessionId":"cs_1","url":"not a url"}"#,
            "<html>oops</html>",
        ] {
            assert!(
                matches!(
                    CheckoutSession::parse(body),
                    Err(CheckoutError::MalformedResponse(_))
                ),
                "accepted {body}"
            );
        }
    }

    #[test]
    fn test_error_classification() {
        assert!(!CheckoutError::EmptyCart.is_retryable());
        assert!(CheckoutError::Status(502).is_retryable());
        assert_eq!(CheckoutError::EmptyCart.user_message(), "Your cart is empty.");
        assert_eq!(
            CheckoutError::Transport("timeout".into()).user_message(),
            CheckoutError::Status(500).user_message()
        );
    }
}
