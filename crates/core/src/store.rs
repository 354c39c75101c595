//! The storefront's single state store.
//!
//! A [`Store`] owns the cart, the favorites list and the storage backend.
//! It is opened once at startup (hydrating from storage), handed by
//! reference to whatever drives it, and is the only path through which
//! state changes. Every confirmed state transition is written through to
//! storage before the mutator returns; mutators that turn out to be no-ops
//! do not write, and only the affected key is rewritten.
//!
//! # Example
//!
//! ```rust
//! use aura_core::{Catalog, MemoryStorage, ProductId, Store};
//!
//! let catalog = Catalog::fixture();
//! let tote = catalog.get(&ProductId::new("1")).unwrap();
//!
//! let mut store = Store::open(MemoryStorage::new());
//! store.add_to_cart(tote, 2).unwrap();
//! assert_eq!(store.cart().total_items(), 2);
//!
//! // A second store over the same storage sees the persisted cart.
//! let storage = store.into_storage();
//! let reopened = Store::open(storage);
//! assert_eq!(reopened.cart().total_items(), 2);
//! ```

use tracing::{debug, info};

use crate::cart::{Cart, CartError};
use crate::favorites::Favorites;
use crate::persistence::{self, StateStorage};
use crate::types::{FavoriteId, Product, ProductId};

/// Cart and favorites state backed by durable storage.
#[derive(Debug)]
pub struct Store<S: StateStorage> {
    cart: Cart,
    favorites: Favorites,
    storage: S,
}

impl<S: StateStorage> Store<S> {
    /// Open the store, restoring any persisted state.
    ///
    /// Missing or malformed persisted values start empty.
    pub fn open(storage: S) -> Self {
        let cart = persistence::load_cart(&storage);
        let favorites = persistence::load_favorites(&storage);
        debug!(
            cart_lines = cart.len(),
            favorites = favorites.len(),
            "Store hydrated"
        );

        Self {
            cart,
            favorites,
            storage,
        }
    }

    /// Tear the store down and hand back its storage.
    pub fn into_storage(self) -> S {
        self.storage
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add `quantity` of `product` to the cart.
    ///
    /// # Errors
    ///
    /// Returns the cart's validation error; nothing is persisted in that case.
    pub fn add_to_cart(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        self.cart.add(product, quantity)?;
        self.persist_cart();
        Ok(())
    }

    /// Remove a product's line from the cart. Returns whether one existed.
    pub fn remove_from_cart(&mut self, product_id: &ProductId) -> bool {
        let removed = self.cart.remove(product_id);
        if removed {
            self.persist_cart();
        }
        removed
    }

    /// Set a line's quantity; zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns the cart's validation error; nothing is persisted in that case.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<bool, CartError> {
        let changed = self.cart.update_quantity(product_id, quantity)?;
        if changed {
            self.persist_cart();
        }
        Ok(changed)
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        if self.cart.is_empty() {
            return;
        }
        self.cart.clear();
        self.persist_cart();
    }

    /// The user landed on the checkout success destination.
    ///
    /// This is the only event that clears the cart on the checkout path.
    /// Payment itself is confirmed by the processor, not verified here.
    pub fn confirm_checkout_success(&mut self, session_id: Option<&str>) {
        info!(
            session_id = session_id.unwrap_or("unknown"),
            items = self.cart.total_items(),
            "Checkout success landing, clearing cart"
        );
        self.clear_cart();
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    /// Favorite a product. Returns `false` if it already was.
    pub fn add_to_favorites(&mut self, product: &Product) -> bool {
        let added = self.favorites.add(product);
        if added {
            self.persist_favorites();
        }
        added
    }

    /// Remove a favorite by entry ID. Returns whether one existed.
    pub fn remove_from_favorites(&mut self, entry_id: &FavoriteId) -> bool {
        let removed = self.favorites.remove(entry_id);
        if removed {
            self.persist_favorites();
        }
        removed
    }

    /// Flip a product's favorite state. Returns whether it is now favorited.
    pub fn toggle_favorite(&mut self, product: &Product) -> bool {
        let favorited = self.favorites.toggle(product);
        self.persist_favorites();
        favorited
    }

    #[must_use]
    pub fn is_favorite(&self, product_id: &ProductId) -> bool {
        self.favorites.is_favorite(product_id)
    }

    fn persist_cart(&self) {
        persistence::save_cart(&self.storage, &self.cart);
    }

    fn persist_favorites(&self) {
        persistence::save_favorites(&self.storage, &self.favorites);
    }
}
