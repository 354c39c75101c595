//! Product categories.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Catalog category.
///
/// Serialized with the display name used by the catalog fixture; parsed from
/// either the display name or the URL slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Bolsas")]
    Bags,
    #[serde(rename = "Carteiras")]
    Wallets,
    #[serde(rename = "Óculos de Sol")]
    Sunglasses,
}

impl Category {
    /// Every category, in catalog order.
    pub const ALL: [Self; 3] = [Self::Bags, Self::Wallets, Self::Sunglasses];

    /// Display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Bags => "Bolsas",
            Self::Wallets => "Carteiras",
            Self::Sunglasses => "Óculos de Sol",
        }
    }

    /// URL-safe slug.
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::Bags => "bolsas",
            Self::Wallets => "carteiras",
            Self::Sunglasses => "oculos-de-sol",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string names no category.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.slug() == needle || c.name().to_lowercase() == needle)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_uses_display_name() {
        let json = serde_json::to_string(&Category::Sunglasses).unwrap();
        assert_eq!(json, "\"Óculos de Sol\"");

        let parsed: Category = serde_json::from_str("\"Carteiras\"").unwrap();
        assert_eq!(parsed, Category::Wallets);
    }

    #[test]
    fn test_parse_slug_and_name() {
        assert_eq!("bolsas".parse::<Category>().unwrap(), Category::Bags);
        assert_eq!("Carteiras".parse::<Category>().unwrap(), Category::Wallets);
        assert_eq!(
            "oculos-de-sol".parse::<Category>().unwrap(),
            Category::Sunglasses
        );
        assert_eq!(
            "óculos de sol".parse::<Category>().unwrap(),
            Category::Sunglasses
        );
        assert!("shoes".parse::<Category>().is_err());
    }
}
