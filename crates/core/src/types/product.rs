//! Catalog product record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::id::ProductId;

/// A catalog product.
///
/// Products are immutable once loaded. Cart lines and favorite entries
/// embed a full snapshot so persisted state stays self-contained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price in the store currency's standard unit.
    pub price: Decimal,
    /// Price before markdown, shown struck through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    /// Primary image; a site-relative path or an absolute URL.
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub description: String,
    pub category: Category,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_best_seller: bool,
    /// Product identifier at the payment processor, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stripe_product_id: Option<String>,
}

const fn default_in_stock() -> bool {
    true
}

impl Product {
    /// Whether the product is marked down from an original price.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.original_price.is_some_and(|original| original > self.price)
    }

    /// Markdown percentage, rounded to a whole number.
    ///
    /// Returns `None` when the product is not on sale.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        use rust_decimal::prelude::ToPrimitive;

        let original = self.original_price.filter(|o| *o > self.price)?;
        ((original - self.price) / original * Decimal::ONE_HUNDRED)
            .round()
            .to_u32()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// Build a minimal product for tests.
    pub(crate) fn product(id: &str, price: Decimal) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price,
            original_price: None,
            image: format!("/product-{id}.png"),
            images: vec![format!("/product-{id}.png")],
            description: format!("Description of product {id}"),
            category: Category::Bags,
            in_stock: true,
            is_new: false,
            is_best_seller: false,
            stripe_product_id: None,
        }
    }

    #[test]
    fn test_discount_percent() {
        let mut p = product("1", Decimal::new(8999, 2));
        assert_eq!(p.discount_percent(), None);
        assert!(!p.is_on_sale());

        p.original_price = Some(Decimal::new(11999, 2));
        assert!(p.is_on_sale());
        assert_eq!(p.discount_percent(), Some(25));
    }

    #[test]
    fn test_serde_camel_case_and_defaults() {
        let json = r#"{
            "id": "7",
            "name": "Carteira Longa",
            "price": 49.99,
            "image": "/carteira.png",
            "description": "Carteira longa",
            "category": "Carteiras",
            "stripeProductId": "prod_123"
        }"#;

        let parsed: Product = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.price, Decimal::new(4999, 2));
        assert!(parsed.in_stock);
        assert!(!parsed.is_new);
        assert!(parsed.images.is_empty());
        assert_eq!(parsed.stripe_product_id.as_deref(), Some("prod_123"));

        let out = serde_json::to_value(&parsed).unwrap();
        assert_eq!(out["stripeProductId"], "prod_123");
        assert!(out.get("originalPrice").is_none());
    }
}
