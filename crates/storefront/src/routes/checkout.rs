//! Checkout route handler.
//!
//! Accepts the shopper's cart lines, builds a checkout request and opens a
//! hosted session with the processor. The cart itself lives with the
//! client and is never touched here.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use aura_core::{Cart, CartLine, Catalog, CheckoutRequest, CheckoutSession, OrderReference};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Checkout request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutBody {
    pub items: Option<Vec<CartLine>>,
    pub success_url: Option<String>,
    pub cancel_url: Option<String>,
}

/// Open a checkout session for the submitted cart.
#[instrument(skip_all, fields(lines = body.items.as_ref().map_or(0, Vec::len)))]
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CheckoutBody>,
) -> Result<Json<CheckoutSession>> {
    let lines = reprice(state.catalog(), body.items.unwrap_or_default())?;
    let cart = Cart::from_lines(lines)?;

    let request = CheckoutRequest::build(&cart, state.checkout(), OrderReference::now())?
        .with_redirects(body.success_url, body.cancel_url)?;

    add_breadcrumb(
        "checkout",
        "Creating checkout session",
        Some(&[("order_id", request.order_id.as_str())]),
    );

    let session = state.stripe().create_session(&request).await?;
    Ok(Json(session))
}

/// Replace each submitted product snapshot with the catalog's copy.
///
/// Clients only choose products and quantities; names and prices always
/// come from the catalog.
fn reprice(catalog: &Catalog, lines: Vec<CartLine>) -> Result<Vec<CartLine>> {
    lines
        .into_iter()
        .map(|line| {
            let product = catalog.get(&line.product.id).ok_or_else(|| {
                AppError::BadRequest(format!("unknown product {}", line.product.id))
            })?;
            Ok(CartLine {
                product: product.clone(),
                quantity: line.quantity,
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use aura_core::ProductId;
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_reprice_uses_catalog_price() {
        let catalog = Catalog::fixture();
        let mut tampered = catalog.get(&ProductId::new("1")).unwrap().clone();
        tampered.price = Decimal::ONE;

        let lines = reprice(
            &catalog,
            vec![CartLine {
                product: tampered,
                quantity: 2,
            }],
        )
        .unwrap();

        assert_eq!(lines[0].product.price, Decimal::new(8999, 2));
        assert_eq!(lines[0].quantity, 2);
    }

    #[test]
    fn test_reprice_rejects_unknown_product() {
        let catalog = Catalog::fixture();
        let mut ghost = catalog.get(&ProductId::new("1")).unwrap().clone();
        ghost.id = ProductId::new("999");

        let result = reprice(
            &catalog,
            vec![CartLine {
                product: ghost,
                quantity: 1,
            }],
        );

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
