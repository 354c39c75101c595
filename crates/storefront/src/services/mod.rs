//! Outbound service clients for the storefront.
//!
//! # Services
//!
//! - `stripe` - Hosted checkout session creation

pub mod stripe;

pub use stripe::{StripeClient, StripeError};
