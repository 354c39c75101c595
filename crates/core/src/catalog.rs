//! Static product catalog.
//!
//! The catalog is a fixture: it is built once, never mutated, and every
//! lookup that misses returns `None` instead of failing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Category, Product, ProductId};

/// Ordering for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Best sellers first, otherwise catalog order.
    #[default]
    Featured,
    /// New arrivals first, otherwise catalog order.
    Newest,
    #[serde(alias = "price-low")]
    PriceAsc,
    #[serde(alias = "price-high")]
    PriceDesc,
}

impl core::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "featured" => Ok(Self::Featured),
            "newest" => Ok(Self::Newest),
            "price-asc" | "price-low" => Ok(Self::PriceAsc),
            "price-desc" | "price-high" => Ok(Self::PriceDesc),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Immutable list of products.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from an explicit product list.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The storefront's built-in product fixture.
    #[must_use]
    pub fn fixture() -> Self {
        Self::new(fixture_products())
    }

    /// All products in catalog order.
    #[must_use]
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Products in a category.
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(move |p| p.category == category)
    }

    /// Products flagged as new arrivals.
    pub fn new_arrivals(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.is_new)
    }

    /// Products flagged as best sellers.
    pub fn best_sellers(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.is_best_seller)
    }

    /// Products marked down from an original price.
    pub fn on_sale(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.is_on_sale())
    }

    /// Case-insensitive search over name, description and category.
    ///
    /// A blank query matches nothing.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
                    || p.category.name().to_lowercase().contains(&needle)
            })
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::fixture()
    }
}

/// Sort a product listing in place.
///
/// Sorting is stable: products that compare equal keep their relative
/// order.
pub fn sort(products: &mut [&Product], order: SortOrder) {
    match order {
        SortOrder::Featured => products.sort_by_key(|p| !p.is_best_seller),
        SortOrder::Newest => products.sort_by_key(|p| !p.is_new),
        SortOrder::PriceAsc => products.sort_by(|a, b| a.price.cmp(&b.price)),
        SortOrder::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price)),
    }
}

struct Fixture {
    id: &'static str,
    name: &'static str,
    cents: i64,
    original_cents: Option<i64>,
    image: &'static str,
    description: &'static str,
    category: Category,
    is_new: bool,
    is_best_seller: bool,
    stripe_product_id: &'static str,
}

impl From<Fixture> for Product {
    fn from(f: Fixture) -> Self {
        Self {
            id: ProductId::new(f.id),
            name: f.name.to_string(),
            price: Decimal::new(f.cents, 2),
            original_price: f.original_cents.map(|c| Decimal::new(c, 2)),
            image: f.image.to_string(),
            images: vec![f.image.to_string()],
            description: f.description.to_string(),
            category: f.category,
            in_stock: true,
            is_new: f.is_new,
            is_best_seller: f.is_best_seller,
            stripe_product_id: Some(f.stripe_product_id.to_string()),
        }
    }
}

#[allow(clippy::too_many_lines)]
fn fixture_products() -> Vec<Product> {
    let fixtures = [
        Fixture {
            id: "1",
            name: "Bolsa Tote Minimalista",
            cents: 8999,
            original_cents: Some(11999),
            image: "/bolsa-tote-elegante-em-couro-premium.png",
            description: "Bolsa tote elegante em couro premium com design minimalista. Perfeita para o dia a dia.",
            category: Category::Bags,
            is_new: true,
            is_best_seller: false,
            stripe_product_id: "prod_TFcXw5gPA3eH4X",
        },
        Fixture {
            id: "2",
            name: "Bolsa Crossbody Clássica",
            cents: 12999,
            original_cents: None,
            image: "/bolsa-crossbod- em-couro-italiano.png",
            description: "Bolsa crossbody em couro italiano com alça ajustável. Design atemporal e funcional.",
            category: Category::Bags,
            is_new: false,
            is_best_seller: true,
            stripe_product_id: "prod_TFcWyp1GXG3KZA",
        },
        Fixture {
            id: "3",
            name: "Bolsa de Ombro Elegante",
            cents: 14999,
            original_cents: None,
            image: "/bolsa-de-ombro-sofisticada.png",
            description: "Bolsa de ombro sofisticada com compartimentos organizados. Ideal para trabalho e eventos.",
            category: Category::Bags,
            is_new: false,
            is_best_seller: false,
            stripe_product_id: "prod_TFcSzNodAWljxU",
        },
        Fixture {
            id: "4",
            name: "Bolsa Clutch Minimalista",
            cents: 7999,
            original_cents: None,
            image: "/clutch-elegante- em-couro-premium.png",
            description: "Clutch elegante em couro premium. Perfeita para eventos especiais e ocasiões formais.",
            category: Category::Bags,
            is_new: false,
            is_best_seller: false,
            stripe_product_id: "prod_TFcS3LfHM1YQ5q",
        },
        Fixture {
            id: "5",
            name: "Bolsa Hobo Relaxada",
            cents: 9999,
            original_cents: Some(12999),
            image: "/bolsa-hobo-em-couro-macio.png",
            description: "Bolsa hobo em couro macio com design descontraído. Confortável e versátil.",
            category: Category::Bags,
            is_new: true,
            is_best_seller: false,
            stripe_product_id: "prod_TFcR8dUEWt6NMk",
        },
        Fixture {
            id: "6",
            name: "Bolsa Satchel Profissional",
            cents: 17999,
            original_cents: None,
            image: "/satchel-profissional-em-couro-italiano.png",
            description: "Satchel profissional em couro italiano. Ideal para executivas e mulheres de negócios.",
            category: Category::Bags,
            is_new: false,
            is_best_seller: true,
            stripe_product_id: "prod_TFcRZvAoQ2dpdJ",
        },
        Fixture {
            id: "7",
            name: "Carteira Longa Minimalista",
            cents: 4999,
            original_cents: None,
            image: "/carteira-longa-em-couro-premium.png",
            description: "Carteira longa em couro premium com múltiplos compartimentos. Design limpo e funcional.",
            category: Category::Wallets,
            is_new: false,
            is_best_seller: false,
            stripe_product_id: "prod_TFcQt7NyrcusfZ",
        },
        Fixture {
            id: "8",
            name: "Carteira Compacta Elegante",
            cents: 3999,
            original_cents: None,
            image: "/carteira-compacta-com-design-minimalista.png",
            description: "Carteira compacta com design minimalista. Perfeita para quem prefere praticidade.",
            category: Category::Wallets,
            is_new: true,
            is_best_seller: false,
            stripe_product_id: "prod_TFcPaPh5fFZhHw",
        },
        Fixture {
            id: "9",
            name: "Carteira de Couro Italiano",
            cents: 8999,
            original_cents: Some(11999),
            image: "/carteira-em-couro-italiano-premium.png",
            description: "Carteira em couro italiano premium com acabamento artesanal. Peça de luxo atemporal.",
            category: Category::Wallets,
            is_new: false,
            is_best_seller: false,
            stripe_product_id: "prod_TFcOa76W7DzCSc",
        },
        Fixture {
            id: "10",
            name: "Carteira Organizadora",
            cents: 6999,
            original_cents: None,
            image: "/carteira-com-múltiplos-compartimentos.png",
            description: "Carteira com múltiplos compartimentos e design organizado. Funcionalidade máxima.",
            category: Category::Wallets,
            is_new: false,
            is_best_seller: false,
            stripe_product_id: "prod_TFcNWUOuODhs0n",
        },
        Fixture {
            id: "11",
            name: "Carteira Minimalista Slim",
            cents: 5999,
            original_cents: None,
            image: "/carteira-ultra-slim.png",
            description: "Carteira ultra-slim com design minimalista. Ideal para bolsas pequenas.",
            category: Category::Wallets,
            is_new: false,
            is_best_seller: false,
            stripe_product_id: "prod_TFcMEVMNO1YiEN",
        },
        Fixture {
            id: "12",
            name: "Carteira de Couro Vegano",
            cents: 4599,
            original_cents: None,
            image: "/carteira-sustentável-em-couro-vegano.png",
            description: "Carteira sustentável em couro vegano. Consciência ambiental e estilo.",
            category: Category::Wallets,
            is_new: true,
            is_best_seller: false,
            stripe_product_id: "prod_TFcMkn9AGErkP2",
        },
        Fixture {
            id: "13",
            name: "Óculos de Sol Aviador Clássico",
            cents: 19999,
            original_cents: None,
            image: "/oculos-de-sol-aviador.png",
            description: "Óculos de sol aviador em acetato premium com lentes polarizadas. Design atemporal e elegante.",
            category: Category::Sunglasses,
            is_new: false,
            is_best_seller: true,
            stripe_product_id: "prod_TFcLdR45bxGgLQ",
        },
        Fixture {
            id: "14",
            name: "Óculos de Sol Quadrados Minimalistas",
            cents: 17999,
            original_cents: Some(22999),
            image: "/oculos-de-sol-quadrados.png",
            description: "Óculos de sol quadrados com design minimalista e lentes de alta qualidade. Estilo moderno e sofisticado.",
            category: Category::Sunglasses,
            is_new: true,
            is_best_seller: false,
            stripe_product_id: "prod_TFcKImByK2VNBq",
        },
    ];

    fixtures.into_iter().map(Product::from).collect()
}
