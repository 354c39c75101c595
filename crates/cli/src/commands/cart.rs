//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! aura cart add 1 -q 2
//! aura cart update 1 3
//! aura cart remove 1
//! aura cart show
//! aura cart clear
//! ```

use std::io::Write;

use aura_core::{Cart, Catalog, ProductId, StateStorage, Store};

use super::money;
use crate::error::CliError;

/// Print the cart contents and total.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn show(cart: &Cart, out: &mut impl Write) -> Result<(), CliError> {
    if cart.is_empty() {
        writeln!(out, "Your cart is empty.")?;
        return Ok(());
    }

    writeln!(out, "Cart ({} item(s))", cart.total_items())?;
    for line in cart.lines() {
        writeln!(
            out,
            "{:>4}  {:<36} {:>3} x {:>11} = {:>12}",
            line.product.id.as_str(),
            line.product.name,
            line.quantity,
            money(line.product.price),
            line.subtotal().map_or_else(|| "-".to_string(), money),
        )?;
    }
    writeln!(out, "Total: {}", money(cart.total()))?;
    Ok(())
}

/// Add a catalog product to the cart.
///
/// # Errors
///
/// Returns the cart's validation error (zero or overflowing quantity).
pub fn add<S: StateStorage>(
    store: &mut Store<S>,
    catalog: &Catalog,
    id: &ProductId,
    quantity: u32,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let Some(product) = catalog.get(id) else {
        writeln!(out, "Product {id} not found.")?;
        return Ok(());
    };

    store.add_to_cart(product, quantity)?;
    let in_cart = store.cart().line(id).map_or(0, |line| line.quantity);
    writeln!(
        out,
        "Added {quantity} x {} ({in_cart} in cart). Total: {}",
        product.name,
        money(store.cart().total())
    )?;
    Ok(())
}

/// Remove a product's line from the cart.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn remove<S: StateStorage>(
    store: &mut Store<S>,
    id: &ProductId,
    out: &mut impl Write,
) -> Result<(), CliError> {
    if store.remove_from_cart(id) {
        writeln!(out, "Removed product {id}. Total: {}", money(store.cart().total()))?;
    } else {
        writeln!(out, "Product {id} is not in the cart.")?;
    }
    Ok(())
}

/// Set a line's quantity; zero removes the line.
///
/// # Errors
///
/// Returns the cart's validation error.
pub fn update<S: StateStorage>(
    store: &mut Store<S>,
    id: &ProductId,
    quantity: u32,
    out: &mut impl Write,
) -> Result<(), CliError> {
    if !store.update_quantity(id, quantity)? {
        writeln!(out, "Product {id} is not in the cart.")?;
        return Ok(());
    }

    if quantity == 0 {
        writeln!(out, "Removed product {id}.")?;
    } else {
        writeln!(out, "Product {id} quantity set to {quantity}.")?;
    }
    writeln!(out, "Total: {}", money(store.cart().total()))?;
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn clear<S: StateStorage>(store: &mut Store<S>, out: &mut impl Write) -> Result<(), CliError> {
    store.clear_cart();
    writeln!(out, "Cart cleared.")?;
    Ok(())
}
