//! Command implementations.
//!
//! Every command writes its human-readable output to a caller-supplied
//! writer, so the binary passes stdout and tests pass a buffer.

pub mod cart;
pub mod checkout;
pub mod favorites;
pub mod products;

use std::io::Write;

use rust_decimal::Decimal;

use aura_core::{CurrencyCode, Price, Product};

/// Format an amount in the store currency.
pub(crate) fn money(amount: Decimal) -> String {
    Price::new(amount, CurrencyCode::default()).display()
}

/// One listing line for a product.
pub(crate) fn write_product_line(out: &mut impl Write, product: &Product) -> std::io::Result<()> {
    let mut tags = Vec::new();
    if let Some(percent) = product.discount_percent() {
        tags.push(format!("-{percent}%"));
    }
    if product.is_new {
        tags.push("new".to_string());
    }
    if product.is_best_seller {
        tags.push("best seller".to_string());
    }
    if !product.in_stock {
        tags.push("out of stock".to_string());
    }

    let tags = if tags.is_empty() {
        String::new()
    } else {
        format!("  [{}]", tags.join(", "))
    };

    writeln!(
        out,
        "{:>4}  {:<36} {:>12}{tags}",
        product.id.as_str(),
        product.name,
        money(product.price)
    )
}
