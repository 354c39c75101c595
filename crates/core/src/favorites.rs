//! Favorites engine.
//!
//! At most one [`FavoriteEntry`] exists per product ID. Entry IDs are
//! generated when a product is favorited and are unrelated to product IDs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{FavoriteId, Product, ProductId};

/// A favorited product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    pub id: FavoriteId,
    pub product: Product,
    pub added_at: DateTime<Utc>,
}

/// A persisted favorites list violated the one-entry-per-product rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate favorite for product {0}")]
pub struct DuplicateFavorite(pub ProductId);

/// The set of favorited products, in the order they were added.
///
/// Serializes as a plain JSON array of entries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites {
    #[serde(deserialize_with = "deserialize_unique")]
    entries: Vec<FavoriteEntry>,
}

fn deserialize_unique<'de, D>(deserializer: D) -> Result<Vec<FavoriteEntry>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let entries = Vec::<FavoriteEntry>::deserialize(deserializer)?;
    ensure_unique(&entries).map_err(serde::de::Error::custom)?;
    Ok(entries)
}

fn ensure_unique(entries: &[FavoriteEntry]) -> Result<(), DuplicateFavorite> {
    for (i, entry) in entries.iter().enumerate() {
        if entries
            .iter()
            .skip(i + 1)
            .any(|other| other.product.id == entry.product.id)
        {
            return Err(DuplicateFavorite(entry.product.id.clone()));
        }
    }
    Ok(())
}

impl Favorites {
    /// Create an empty favorites list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from existing entries.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateFavorite`] if two entries share a product ID.
    pub fn from_entries(entries: Vec<FavoriteEntry>) -> Result<Self, DuplicateFavorite> {
        ensure_unique(&entries)?;
        Ok(Self { entries })
    }

    /// Favorite `product` now.
    ///
    /// Returns `false` if the product was already favorited, in which case
    /// nothing changes.
    pub fn add(&mut self, product: &Product) -> bool {
        self.add_at(product, Utc::now())
    }

    /// Favorite `product` with an explicit timestamp.
    pub fn add_at(&mut self, product: &Product, added_at: DateTime<Utc>) -> bool {
        if self.is_favorite(&product.id) {
            return false;
        }

        self.entries.push(FavoriteEntry {
            id: FavoriteId::generate(),
            product: product.clone(),
            added_at,
        });
        true
    }

    /// Remove the entry with `entry_id`.
    ///
    /// Returns `false` if no such entry exists.
    pub fn remove(&mut self, entry_id: &FavoriteId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.id != entry_id);
        self.entries.len() < before
    }

    /// Remove the entry for `product_id`, whatever its entry ID.
    pub fn remove_product(&mut self, product_id: &ProductId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.product.id != product_id);
        self.entries.len() < before
    }

    /// Unfavorite `product` if favorited, favorite it otherwise.
    ///
    /// Returns whether the product is favorited afterwards.
    pub fn toggle(&mut self, product: &Product) -> bool {
        if self.remove_product(&product.id) {
            false
        } else {
            self.add(product)
        }
    }

    #[must_use]
    pub fn is_favorite(&self, product_id: &ProductId) -> bool {
        self.entries.iter().any(|e| &e.product.id == product_id)
    }

    /// The entry for `product_id`, if favorited.
    #[must_use]
    pub fn entry_for(&self, product_id: &ProductId) -> Option<&FavoriteEntry> {
        self.entries.iter().find(|e| &e.product.id == product_id)
    }

    #[must_use]
    pub fn entries(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
