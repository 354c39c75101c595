//! Persistence adapter for cart and favorites state.
//!
//! State is mirrored to a string key-value store under two fixed keys.
//! Reads never fail from the caller's point of view: a missing, unreadable
//! or malformed value falls back to empty state and logs a warning. Writes
//! are best-effort and never roll back the in-memory state.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{error, warn};

use crate::cart::Cart;
use crate::favorites::Favorites;

/// Storage key holding the serialized cart.
pub const CART_KEY: &str = "aura-cart";

/// Storage key holding the serialized favorites list.
pub const FAVORITES_KEY: &str = "minimalwear-favorites";

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend refused the operation.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Durable string key-value storage.
///
/// Implementations decide where data lives; callers only see keys and
/// serialized documents.
pub trait StateStorage {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: StateStorage + ?Sized> StateStorage for &S {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// In-process storage, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }
}

/// Restore the cart, falling back to an empty cart.
pub fn load_cart<S: StateStorage>(storage: &S) -> Cart {
    load_or_default(storage, CART_KEY)
}

/// Restore the favorites list, falling back to an empty list.
pub fn load_favorites<S: StateStorage>(storage: &S) -> Favorites {
    load_or_default(storage, FAVORITES_KEY)
}

/// Mirror the cart to storage. Failures are logged, not returned.
pub fn save_cart<S: StateStorage>(storage: &S, cart: &Cart) {
    save(storage, CART_KEY, cart);
}

/// Mirror the favorites list to storage. Failures are logged, not returned.
pub fn save_favorites<S: StateStorage>(storage: &S, favorites: &Favorites) {
    save(storage, FAVORITES_KEY, favorites);
}

fn load_or_default<S, T>(storage: &S, key: &str) -> T
where
    S: StateStorage,
    T: DeserializeOwned + Default,
{
    let raw = match storage.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            warn!(key, error = %e, "Failed to read persisted state, starting empty");
            return T::default();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(key, error = %e, "Discarding malformed persisted state");
        T::default()
    })
}

fn save<S, T>(storage: &S, key: &str, value: &T)
where
    S: StateStorage,
    T: Serialize,
{
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            error!(key, error = %e, "Failed to serialize state");
            return;
        }
    };

    if let Err(e) = storage.write(key, &json) {
        error!(key, error = %e, "Failed to persist state");
    }
}
