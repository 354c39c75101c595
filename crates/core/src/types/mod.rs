//! Core types for the Aura storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;
pub mod price;
pub mod product;

pub use category::{Category, UnknownCategory};
pub use id::*;
pub use price::{CurrencyCode, Price, UnknownCurrency, to_minor_units};
pub use product::Product;
