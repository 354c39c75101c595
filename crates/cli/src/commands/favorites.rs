//! Favorites commands.
//!
//! # Usage
//!
//! ```bash
//! aura favorites toggle 4
//! aura favorites list
//! aura favorites remove 5f0c...   # entry ID from `list`
//! ```

use std::io::Write;

use aura_core::{Catalog, FavoriteId, Favorites, ProductId, StateStorage, Store};

use super::money;
use crate::error::CliError;

/// Print the favorites list with entry IDs.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn list(favorites: &Favorites, out: &mut impl Write) -> Result<(), CliError> {
    if favorites.is_empty() {
        writeln!(out, "No favorites yet.")?;
        return Ok(());
    }

    for entry in favorites.entries() {
        writeln!(
            out,
            "{}  {:>4}  {:<36} {:>12}  added {}",
            entry.id,
            entry.product.id.as_str(),
            entry.product.name,
            money(entry.product.price),
            entry.added_at.format("%Y-%m-%d %H:%M")
        )?;
    }
    writeln!(out, "{} favorite(s)", favorites.len())?;
    Ok(())
}

/// Favorite a catalog product.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn add<S: StateStorage>(
    store: &mut Store<S>,
    catalog: &Catalog,
    id: &ProductId,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let Some(product) = catalog.get(id) else {
        writeln!(out, "Product {id} not found.")?;
        return Ok(());
    };

    if store.add_to_favorites(product) {
        writeln!(out, "Added {} to favorites.", product.name)?;
    } else {
        writeln!(out, "{} is already a favorite.", product.name)?;
    }
    Ok(())
}

/// Remove a favorite by entry ID.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn remove<S: StateStorage>(
    store: &mut Store<S>,
    entry_id: &str,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let removed = entry_id
        .parse::<FavoriteId>()
        .is_ok_and(|id| store.remove_from_favorites(&id));

    if removed {
        writeln!(out, "Favorite removed.")?;
    } else {
        writeln!(out, "Favorite {entry_id} not found.")?;
    }
    Ok(())
}

/// Flip a product's favorite state.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn toggle<S: StateStorage>(
    store: &mut Store<S>,
    catalog: &Catalog,
    id: &ProductId,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let Some(product) = catalog.get(id) else {
        writeln!(out, "Product {id} not found.")?;
        return Ok(());
    };

    if store.toggle_favorite(product) {
        writeln!(out, "Added {} to favorites.", product.name)?;
    } else {
        writeln!(out, "Removed {} from favorites.", product.name)?;
    }
    Ok(())
}
