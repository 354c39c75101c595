//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! aura products --category bolsas --sort price-asc
//! aura products --search couro
//! aura product 3
//! ```

use std::io::Write;

use aura_core::catalog::{self, SortOrder};
use aura_core::{Catalog, Category, Product, ProductId};

use super::{money, write_product_line};
use crate::error::CliError;

/// Listing filters.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<Category>,
    pub search: Option<String>,
    pub sort: SortOrder,
    pub new_only: bool,
    pub best_sellers_only: bool,
    pub on_sale_only: bool,
}

impl ProductFilter {
    /// Apply the filter to the catalog, returning the sorted listing.
    #[must_use]
    pub fn apply<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        let mut listing: Vec<&Product> = match self.search.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => catalog.search(q),
            _ => self.source(catalog),
        };

        listing.retain(|p| {
            self.category.is_none_or(|c| p.category == c)
                && (!self.new_only || p.is_new)
                && (!self.best_sellers_only || p.is_best_seller)
                && (!self.on_sale_only || p.is_on_sale())
        });
        catalog::sort(&mut listing, self.sort);
        listing
    }

    /// Narrowest catalog view for the filter; `apply` re-checks the rest.
    fn source<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        if let Some(category) = self.category {
            catalog.by_category(category).collect()
        } else if self.on_sale_only {
            catalog.on_sale().collect()
        } else if self.best_sellers_only {
            catalog.best_sellers().collect()
        } else if self.new_only {
            catalog.new_arrivals().collect()
        } else {
            catalog.all().iter().collect()
        }
    }
}

/// List products matching `filter`.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn list(catalog: &Catalog, filter: &ProductFilter, out: &mut impl Write) -> Result<(), CliError> {
    let listing = filter.apply(catalog);

    if listing.is_empty() {
        writeln!(out, "No products found.")?;
        return Ok(());
    }

    for product in &listing {
        write_product_line(out, product)?;
    }
    writeln!(out, "{} product(s)", listing.len())?;
    Ok(())
}

/// Show one product in detail.
///
/// An unknown ID is reported, not treated as a failure.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn show(catalog: &Catalog, id: &ProductId, out: &mut impl Write) -> Result<(), CliError> {
    let Some(product) = catalog.get(id) else {
        writeln!(out, "Product {id} not found.")?;
        return Ok(());
    };

    writeln!(out, "{} (#{})", product.name, product.id)?;
    writeln!(out, "Category: {}", product.category)?;
    match product.original_price.filter(|_| product.is_on_sale()) {
        Some(original) => writeln!(
            out,
            "Price:    {} (was {})",
            money(product.price),
            money(original)
        )?,
        None => writeln!(out, "Price:    {}", money(product.price))?,
    }
    writeln!(
        out,
        "Stock:    {}",
        if product.in_stock { "available" } else { "out of stock" }
    )?;
    writeln!(out)?;
    writeln!(out, "{}", product.description)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<(), CliError>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_filter_by_category_and_sort() {
        let catalog = Catalog::fixture();
        let filter = ProductFilter {
            category: Some(Category::Wallets),
            sort: SortOrder::PriceAsc,
            ..ProductFilter::default()
        };

        let listing = filter.apply(&catalog);

        assert_eq!(listing.len(), 6);
        assert!(listing.windows(2).all(|w| w[0].price <= w[1].price));
    }

    #[test]
    fn test_filter_flags() {
        let catalog = Catalog::fixture();
        let new = ProductFilter {
            new_only: true,
            ..ProductFilter::default()
        };
        let best = ProductFilter {
            best_sellers_only: true,
            ..ProductFilter::default()
        };
        let sale = ProductFilter {
            on_sale_only: true,
            ..ProductFilter::default()
        };

        assert_eq!(new.apply(&catalog).len(), 5);
        assert_eq!(best.apply(&catalog).len(), 3);
        assert_eq!(sale.apply(&catalog).len(), 4);
    }

    #[test]
    fn test_combined_filters_and_default_order() {
        let catalog = Catalog::fixture();
        let filter = ProductFilter {
            category: Some(Category::Bags),
            on_sale_only: true,
            ..ProductFilter::default()
        };

        let listing = filter.apply(&catalog);
        assert!(!listing.is_empty());
        assert!(
            listing
                .iter()
                .all(|p| p.category == Category::Bags && p.is_on_sale())
        );

        let all = ProductFilter::default().apply(&catalog);
        assert_eq!(all.len(), 14);
        assert!(all[0].is_best_seller);
    }

    #[test]
    fn test_list_reports_empty_result() {
        let catalog = Catalog::fixture();
        let filter = ProductFilter {
            search: Some("zzz-nothing".to_string()),
            ..ProductFilter::default()
        };

        let output = render(|out| list(&catalog, &filter, out));

        assert_eq!(output, "No products found.\n");
    }

    #[test]
    fn test_show_unknown_product() {
        let catalog = Catalog::fixture();

        let output = render(|out| show(&catalog, &ProductId::new("999"), out));

        assert_eq!(output, "Product 999 not found.\n");
    }

    #[test]
    fn test_show_sale_product() {
        let catalog = Catalog::fixture();

        let output = render(|out| show(&catalog, &ProductId::new("1"), out));

        assert!(output.contains("R$ 89.99 (was R$ 119.99)"));
    }
}
