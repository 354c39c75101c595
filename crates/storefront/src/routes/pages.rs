//! Checkout landing pages.
//!
//! The processor redirects the shopper here after payment or cancellation.
//! Clearing the cart on success is the client's job; these handlers only
//! acknowledge the landing.

use axum::extract::Query;
use serde::Deserialize;
use tracing::instrument;

/// Success landing query parameters.
#[derive(Debug, Deserialize)]
pub struct SuccessQuery {
    pub session_id: Option<String>,
}

/// Payment completed landing page.
#[instrument]
pub async fn success(Query(query): Query<SuccessQuery>) -> String {
    tracing::info!(
        session_id = query.session_id.as_deref().unwrap_or("unknown"),
        "Checkout success landing"
    );

    match query.session_id {
        Some(id) => format!("Pedido confirmado! Obrigado pela sua compra.\nSessão: {id}\n"),
        None => "Pedido confirmado! Obrigado pela sua compra.\n".to_string(),
    }
}

/// Payment cancelled landing page.
#[instrument]
pub async fn cancel() -> &'static str {
    "Pagamento cancelado. Seu carrinho foi mantido.\n"
}
