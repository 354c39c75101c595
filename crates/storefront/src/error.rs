//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers return `Result<T, AppError>`.
//! Responses are JSON objects of the form `{"error": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use aura_core::{CartError, CheckoutError};

use crate::services::StripeError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Payment processor call failed.
    #[error("Stripe error: {0}")]
    Stripe(#[from] StripeError),

    /// Checkout request could not be built.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Submitted cart lines are invalid.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Stripe(_) => StatusCode::BAD_GATEWAY,
            Self::Checkout(err) => match err {
                CheckoutError::EmptyCart | CheckoutError::InvalidRedirect(_) => {
                    StatusCode::BAD_REQUEST
                }
                CheckoutError::InProgress => StatusCode::CONFLICT,
                CheckoutError::InvalidAmount(_) | CheckoutError::InvalidImage(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                CheckoutError::Transport(_)
                | CheckoutError::Status(_)
                | CheckoutError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
            },
            Self::Cart(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to the client.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Stripe(_) => "Failed to create checkout session".to_string(),
            Self::Checkout(err) => match err {
                CheckoutError::EmptyCart => "No items provided".to_string(),
                CheckoutError::InvalidRedirect(_) => "Invalid redirect URL".to_string(),
                CheckoutError::InvalidAmount(_) | CheckoutError::InvalidImage(_) => {
                    "Internal server error".to_string()
                }
                _ => "Failed to create checkout session".to_string(),
            },
            Self::Cart(err) => err.to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
            Self::NotFound(_) | Self::BadRequest(_) => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let body = ErrorBody {
            error: self.client_message(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("checkout", "Creating session", Some(&[("order_id", "LUMA-1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use aura_core::ProductId;

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product 123".to_string());
        assert_eq!(err.to_string(), "Not found: product 123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            let response = err.into_response();
            response.status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::EmptyCart)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Cart(CartError::ZeroQuantity)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Stripe(StripeError::Parse("no url".to_string()))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_client_message_hides_upstream_detail() {
        let err = AppError::Stripe(StripeError::Api {
            status: 401,
            message: "Invalid API Key provided: sk_live_****".to_string(),
        });
        assert_eq!(err.client_message(), "Failed to create checkout session");

        let err = AppError::Checkout(CheckoutError::InvalidAmount(ProductId::new("7")));
        assert_eq!(err.client_message(), "Internal server error");

        let err = AppError::Checkout(CheckoutError::EmptyCart);
        assert_eq!(err.client_message(), "No items provided");
    }
}
