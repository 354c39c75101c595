//! Cart engine.
//!
//! A [`Cart`] is an ordered list of [`CartLine`]s, at most one per product,
//! plus a derived total. The total is private and recomputed after every
//! mutation (and on deserialization), so it can never drift from the lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Product, ProductId};

/// Errors from cart mutations.
///
/// A mutation that returns an error leaves the cart unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Quantity must be at least one.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// The line quantity would exceed the representable maximum.
    #[error("quantity overflow for product {0}")]
    QuantityOverflow(ProductId),

    /// The cart total would exceed the representable maximum.
    #[error("cart total overflow")]
    TotalOverflow,

    /// Two lines reference the same product.
    #[error("duplicate cart line for product {0}")]
    DuplicateLine(ProductId),
}

/// One product in the cart and how many of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product snapshot taken when the line was created.
    pub product: Product,
    /// Always at least 1 while the line exists.
    pub quantity: u32,
}

impl CartLine {
    /// Unit price times quantity, or `None` on overflow.
    #[must_use]
    pub fn subtotal(&self) -> Option<Decimal> {
        self.product.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Shopping cart.
///
/// Serializes as `{"items": [...], "total": ...}`. On deserialization the
/// persisted total is ignored and recomputed; duplicate product lines or
/// zero quantities make the document invalid.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "CartDocument")]
pub struct Cart {
    items: Vec<CartLine>,
    total: Decimal,
}

/// Wire shape accepted when deserializing a [`Cart`].
#[derive(Deserialize)]
struct CartDocument {
    items: Vec<CartLine>,
}

impl TryFrom<CartDocument> for Cart {
    type Error = CartError;

    fn try_from(doc: CartDocument) -> Result<Self, Self::Error> {
        Self::from_lines(doc.items)
    }
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from existing lines, validating every cart invariant.
    ///
    /// # Errors
    ///
    /// Returns an error if a quantity is zero, two lines share a product,
    /// or the total overflows.
    pub fn from_lines(items: Vec<CartLine>) -> Result<Self, CartError> {
        for (i, line) in items.iter().enumerate() {
            if line.quantity == 0 {
                return Err(CartError::ZeroQuantity);
            }
            if items
                .iter()
                .skip(i + 1)
                .any(|other| other.product.id == line.product.id)
            {
                return Err(CartError::DuplicateLine(line.product.id.clone()));
            }
        }

        let total = calculate_total(&items).ok_or(CartError::TotalOverflow)?;
        Ok(Self { items, total })
    }

    /// Add `quantity` of `product`.
    ///
    /// Increments the existing line for the product, or appends a new line
    /// at the end.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] for a zero quantity and an
    /// overflow error if the line quantity or total would overflow.
    pub fn add(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        let mut items = self.items.clone();
        if let Some(existing) = items.iter_mut().find(|l| l.product.id == product.id) {
            existing.quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or_else(|| CartError::QuantityOverflow(product.id.clone()))?;
        } else {
            items.push(CartLine {
                product: product.clone(),
                quantity,
            });
        }

        self.replace_items(items)
    }

    /// Add a single unit of `product`.
    ///
    /// # Errors
    ///
    /// See [`Cart::add`].
    pub fn add_one(&mut self, product: &Product) -> Result<(), CartError> {
        self.add(product, 1)
    }

    /// Remove the line for `product_id`.
    ///
    /// Returns `false` (and does nothing) if no such line exists.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|l| &l.product.id != product_id);
        let removed = self.items.len() < before;
        if removed {
            self.recalculate();
        }
        removed
    }

    /// Set the quantity of the line for `product_id`.
    ///
    /// A quantity of zero removes the line. Returns `Ok(false)` if no line
    /// exists for the product.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::TotalOverflow`] if the new total would overflow.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<bool, CartError> {
        if quantity == 0 {
            return Ok(self.remove(product_id));
        }

        let mut items = self.items.clone();
        let Some(line) = items.iter_mut().find(|l| &l.product.id == product_id) else {
            return Ok(false);
        };
        line.quantity = quantity;

        self.replace_items(items)?;
        Ok(true)
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
        self.total = Decimal::ZERO;
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Sum of unit price times quantity across all lines.
    #[must_use]
    pub const fn total(&self) -> Decimal {
        self.total
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.items
    }

    /// The line for `product_id`, if any.
    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.items.iter().find(|l| &l.product.id == product_id)
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn replace_items(&mut self, items: Vec<CartLine>) -> Result<(), CartError> {
        let total = calculate_total(&items).ok_or(CartError::TotalOverflow)?;
        self.items = items;
        self.total = total;
        Ok(())
    }

    fn recalculate(&mut self) {
        // Removing lines only shrinks the sum, so this cannot overflow.
        self.total = calculate_total(&self.items).unwrap_or_default();
    }
}

/// Sum of line subtotals, or `None` on overflow.
fn calculate_total(items: &[CartLine]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |acc, line| acc.checked_add(line.subtotal()?))
}
