//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Catalog API
//! GET  /api/products           - Product listing (?category=&q=&sort=)
//! GET  /api/products/{id}      - Product detail
//!
//! # Checkout
//! POST /api/checkout           - Open a hosted checkout session
//! GET  /success                - Payment completed landing
//! GET  /cancel                 - Payment cancelled landing
//! ```

pub mod checkout;
pub mod pages;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the catalog API router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .route("/checkout", post(checkout::create))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api", api_routes())
        // Processor redirect destinations
        .route("/success", get(pages::success))
        .route("/cancel", get(pages::cancel))
}
