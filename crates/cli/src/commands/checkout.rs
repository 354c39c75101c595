//! Checkout commands.
//!
//! # Usage
//!
//! ```bash
//! aura checkout                      # prints the hosted checkout URL
//! aura success --session-id cs_...   # after paying: clears the cart
//! aura cancel                        # after abandoning: cart is kept
//! ```

use std::io::Write;

use aura_core::{StateStorage, Store};

use super::money;
use crate::checkout::{CheckoutClient, Redirects};
use crate::error::CliError;

/// Open a checkout session and print where to pay.
///
/// The cart is left untouched whatever the outcome.
///
/// # Errors
///
/// Returns the checkout failure (empty cart, in progress, or a generic
/// retryable failure).
pub async fn start<S: StateStorage>(
    store: &Store<S>,
    client: &CheckoutClient,
    redirects: &Redirects,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let session = client.start(store.cart(), redirects).await?;

    writeln!(
        out,
        "Checkout ready for {} item(s), {}.",
        store.cart().total_items(),
        money(store.cart().total())
    )?;
    writeln!(out, "Session: {}", session.session_id)?;
    writeln!(out, "Complete your payment at:")?;
    writeln!(out, "{}", session.url)?;
    Ok(())
}

/// The shopper returned from a completed payment.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn success<S: StateStorage>(
    store: &mut Store<S>,
    session_id: Option<&str>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    store.confirm_checkout_success(session_id);
    writeln!(out, "Thank you! Your order is confirmed and your cart has been cleared.")?;
    Ok(())
}

/// The shopper abandoned the hosted checkout.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn cancel<S: StateStorage>(store: &Store<S>, out: &mut impl Write) -> Result<(), CliError> {
    writeln!(
        out,
        "Checkout cancelled. Your cart still has {} item(s).",
        store.cart().total_items()
    )?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use aura_core::{Catalog, CheckoutError, MemoryStorage, ProductId};
    use url::Url;

    use super::*;

    fn store_with_item() -> Store<MemoryStorage> {
        let catalog = Catalog::fixture();
        let mut store = Store::open(MemoryStorage::new());
        store
            .add_to_cart(catalog.get(&ProductId::new("1")).unwrap(), 2)
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_empty_cart_checkout() {
        let store = Store::open(MemoryStorage::new());
        let client = CheckoutClient::with_endpoint(
            &Url::parse("http://127.0.0.1:9").unwrap(),
            Duration::from_secs(1),
        )
        .unwrap();

        let err = start(&store, &client, &Redirects::default(), &mut Vec::new())
            .await
            .unwrap_err();

        assert!(matches!(err, CliError::Checkout(CheckoutError::EmptyCart)));
        assert_eq!(err.to_string(), "Your cart is empty.");
    }

    #[test]
    fn test_success_clears_cart() {
        let mut store = store_with_item();

        success(&mut store, Some("cs_test_1"), &mut Vec::new()).unwrap();

        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_cancel_keeps_cart() {
        let store = store_with_item();
        let mut out = Vec::new();

        cancel(&store, &mut out).unwrap();

        assert_eq!(store.cart().total_items(), 2);
        assert!(String::from_utf8(out).unwrap().contains("2 item(s)"));
    }
}
