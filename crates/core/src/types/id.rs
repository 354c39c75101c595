//! Newtype IDs for type-safe entity references.
//!
//! Catalog identifiers are opaque strings supplied by the product fixture.
//! Favorite entries get their own UUID at favorite-time, independent of the
//! product they point to.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<&str>`, `From<String>` and `AsRef<str>` implementations
///
/// # Example
///
/// ```rust
/// # use aura_core::define_id;
/// define_id!(SkuId);
/// define_id!(CollectionId);
///
/// let sku = SkuId::new("bag-01");
/// let collection = CollectionId::new("bag-01");
///
/// // These are different types, so this won't compile:
/// // let _: SkuId = collection;
/// assert_eq!(sku.as_str(), collection.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);

/// Identifier of a favorite entry.
///
/// Generated when a product is favorited; two entries for the same product
/// at different times get different IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteId(Uuid);

impl FavoriteId {
    /// Generate a fresh random ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for FavoriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FavoriteId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_display_and_serde() {
        let id = ProductId::new("13");
        assert_eq!(id.to_string(), "13");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"13\"");

        let parsed: ProductId = serde_json::from_str("\"13\"").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_favorite_ids_are_unique() {
        assert_ne!(FavoriteId::generate(), FavoriteId::generate());
    }

    #[test]
    fn test_favorite_id_parse() {
        let id = FavoriteId::generate();
        let parsed: FavoriteId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<FavoriteId>().is_err());
    }
}
