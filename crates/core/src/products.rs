//! Products

use std::{convert::Infallible, fmt, str::FromStr};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Deserializer, Serialize};

use crate::pricing::{PricingError, money_from_decimal};

/// Product identifier.
///
/// Sources use either integers or strings. A string holding the canonical decimal form of an
/// integer is read as [`ProductId::Number`], so `"7"` and `7` address the same product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum ProductId {
    /// Integer identifier, as assigned by the admin screen.
    Number(u64),

    /// Free-form identifier.
    Text(String),
}

impl ProductId {
    /// Derive an identifier from a product name.
    ///
    /// The name is lower-cased and every run of whitespace becomes a single `-`. Two products with
    /// the same name derive the same identifier.
    pub fn from_name(name: &str) -> Self {
        let slug = name
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-");

        Self::from(slug)
    }
}

impl From<u64> for ProductId {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        match value.parse::<u64>() {
            Ok(number) if number.to_string() == value => Self::Number(number),
            _ => Self::Text(value),
        }
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl FromStr for ProductId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawProductId {
            Number(u64),
            Text(String),
        }

        Ok(match RawProductId::deserialize(deserializer)? {
            RawProductId::Number(number) => Self::Number(number),
            RawProductId::Text(text) => Self::from(text),
        })
    }
}

/// Product
///
/// Carts store a copy of this record per line, taken when the product is first added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier, unique within a catalog
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Unit price in major units
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Discount in percent points, `0` means no discount badge
    #[serde(default)]
    pub off: u8,

    /// Product description
    #[serde(default)]
    pub description: String,

    /// Image reference
    #[serde(default, alias = "imageUrl")]
    pub image: String,
}

impl Product {
    /// The advertised discount, if any.
    pub fn discount(&self) -> Option<Percentage> {
        (self.off > 0)
            .then(|| Percentage::from(Decimal::from(self.off.min(100)) / Decimal::ONE_HUNDRED))
    }

    /// Unit price as money in the given currency.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the price is negative or does not fit in minor units.
    pub fn unit_price(
        &self,
        currency: &'static Currency,
    ) -> Result<Money<'static, Currency>, PricingError> {
        money_from_decimal(self.price, currency)
    }
}

/// Product record as published by a catalog source, where the identifier is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductRecord {
    /// Identifier, when the source provides one
    #[serde(default)]
    pub id: Option<ProductId>,

    /// Display name
    pub name: String,

    /// Unit price in major units
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Discount in percent points
    #[serde(default)]
    pub off: u8,

    /// Product description
    #[serde(default)]
    pub description: String,

    /// Image reference
    #[serde(default, alias = "imageUrl")]
    pub image: String,
}

impl ProductRecord {
    /// Build a product using the given identifier.
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            off: self.off,
            description: self.description,
            image: self.image,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn from_name_lowercases_and_collapses_whitespace() {
        let id = ProductId::from_name("  Cono de   Helado\tMágico ");

        assert_eq!(id, ProductId::Text("cono-de-helado-mágico".to_string()));
    }

    #[test]
    fn numeric_strings_are_read_as_numbers() {
        assert_eq!(ProductId::from("12"), ProductId::Number(12));
        assert_eq!(ProductId::from("012"), ProductId::Text("012".to_string()));
        assert_eq!(ProductId::from("A"), ProductId::Text("A".to_string()));
    }

    #[test]
    fn ids_deserialize_from_numbers_and_strings() -> TestResult {
        let ids: Vec<ProductId> = serde_json::from_str(r#"[3, "3", "vasos"]"#)?;

        assert_eq!(
            ids,
            vec![
                ProductId::Number(3),
                ProductId::Number(3),
                ProductId::Text("vasos".to_string()),
            ]
        );

        Ok(())
    }

    #[test]
    fn product_accepts_image_url_alias() -> TestResult {
        let product: Product = serde_json::from_str(
            r#"{"id": 1, "name": "Vasos", "price": 15000.0, "off": 20, "description": "", "imageUrl": "vasos.jpg"}"#,
        )?;

        assert_eq!(product.image, "vasos.jpg");
        assert_eq!(product.price, Decimal::new(15000, 0));

        Ok(())
    }

    #[test]
    fn discount_is_none_when_off_is_zero() {
        let product = Product {
            id: ProductId::Number(1),
            name: "Cono".to_string(),
            price: Decimal::new(800, 0),
            off: 0,
            description: String::new(),
            image: String::new(),
        };

        assert!(product.discount().is_none());
    }

    #[test]
    fn unit_price_converts_to_minor_units() -> TestResult {
        let product = Product {
            id: ProductId::Number(1),
            name: "Cono".to_string(),
            price: Decimal::new(80050, 2),
            off: 0,
            description: String::new(),
            image: String::new(),
        };

        assert_eq!(
            product.unit_price(iso::ARS)?,
            Money::from_minor(80_050, iso::ARS)
        );

        Ok(())
    }
}
