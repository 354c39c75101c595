//! Application state shared across handlers.

use std::sync::Arc;

use aura_core::{Catalog, CheckoutSettings};

use crate::config::StorefrontConfig;
use crate::services::{StripeClient, StripeError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the catalog, checkout settings and the processor client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    checkout: CheckoutSettings,
    stripe: StripeClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the processor client cannot be built.
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Result<Self, StripeError> {
        let stripe = StripeClient::new(&config.stripe)?;
        let checkout = config.checkout_settings();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                checkout,
                stripe,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the checkout settings.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutSettings {
        &self.inner.checkout
    }

    /// Get a reference to the Stripe API client.
    #[must_use]
    pub fn stripe(&self) -> &StripeClient {
        &self.inner.stripe
    }
}
