//! Aura Core - storefront state engine and shared types.
//!
//! This crate provides the domain used across all Aura components:
//! - `storefront` - HTTP service: catalog API and checkout session proxy
//! - `cli` - Terminal shopper: browse, cart, favorites and checkout
//!
//! # Architecture
//!
//! The core crate contains types, the cart and favorites engines, the
//! storage trait and the checkout request builder. No network clients and
//! no filesystem access live here; storage backends implement
//! [`StateStorage`] elsewhere.
//!
//! # Modules
//!
//! - [`types`] - IDs, prices, categories and products
//! - [`catalog`] - Static product catalog and its queries
//! - [`cart`] - Cart lines and totals
//! - [`favorites`] - Favorited products
//! - [`persistence`] - Storage trait, keys and load/save with fallback
//! - [`store`] - The single write-through state store
//! - [`checkout`] - Checkout request builder and session parsing

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod favorites;
pub mod persistence;
pub mod store;
pub mod types;

pub use cart::{Cart, CartError, CartLine};
pub use catalog::{Catalog, SortOrder};
pub use checkout::{
    CheckoutError, CheckoutLineItem, CheckoutRequest, CheckoutSession, CheckoutSettings,
    LineItemMetadata, OrderReference,
};
pub use favorites::{DuplicateFavorite, FavoriteEntry, Favorites};
pub use persistence::{CART_KEY, FAVORITES_KEY, MemoryStorage, StateStorage, StorageError};
pub use store::Store;
pub use types::*;
