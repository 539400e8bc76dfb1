//! Catalog
//!
//! Loads the product list from a static JSON resource and turns it into display cards.

use std::collections::HashSet;

use reqwest::{Client, StatusCode, Url};
use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    pricing::{PricingError, format_money, percent_points},
    products::{Product, ProductId, ProductRecord},
};

/// Default location of the catalog resource.
pub const DEFAULT_CATALOG_PATH: &str = "datos/productos.json";

/// Message shown when the catalog resource answered with an error status.
pub const UNAVAILABLE_MESSAGE: &str = "Lo sentimos, no pudimos cargar los productos mágicos.";

/// Message shown when the catalog could not be fetched or read at all.
pub const CONNECTION_MESSAGE: &str = "Error de conexión al obtener los datos de los productos.";

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The resource could not be fetched.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    /// The resource answered with a non-success status.
    #[error("catalog request failed with status {0}")]
    Status(StatusCode),

    /// The body was not a JSON array of products.
    #[error("catalog is not a list of products")]
    Decode(#[from] serde_json::Error),

    /// A record had no identifier and the policy requires one.
    #[error("product {name:?} has no identifier")]
    MissingIdentifier {
        /// Name of the offending product
        name: String,
    },

    /// Two records share an identifier and the policy requires them to be unique.
    #[error("product identifier {0} is used more than once")]
    DuplicateIdentifier(ProductId),
}

impl CatalogError {
    /// Whether the error means the resource could not be obtained at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Status(_))
    }

    /// The static fallback message the catalog page shows instead of products.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::Status(_) => UNAVAILABLE_MESSAGE,
            _ => CONNECTION_MESSAGE,
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(error: reqwest::Error) -> Self {
        match error.status() {
            Some(status) => Self::Status(status),
            None => Self::Unavailable(error.to_string()),
        }
    }
}

/// How records without an identifier are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdentifierPolicy {
    /// Derive an identifier from the product name; collisions are logged and kept.
    #[default]
    DeriveFromName,

    /// Reject records without an identifier and duplicate identifiers.
    Require,
}

/// A source of catalog JSON.
pub trait CatalogSource {
    /// Fetch the raw catalog body.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Unavailable`] or [`CatalogError::Status`] when the resource cannot
    /// be obtained.
    async fn fetch(&self) -> Result<String, CatalogError>;
}

/// Catalog served over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: Client,
    url: Url,
}

impl HttpCatalogSource {
    /// Create a source for the given absolute URL.
    pub fn new(url: Url) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }

    /// Resolve `path` against `base` (usually the page location).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Unavailable`] if either part is not a valid URL.
    pub fn resolve(base: &str, path: &str) -> Result<Self, CatalogError> {
        let url = Url::parse(base)
            .and_then(|base| base.join(path))
            .map_err(|error| CatalogError::Unavailable(error.to_string()))?;

        Ok(Self::new(url))
    }

    /// URL this source reads from.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self) -> Result<String, CatalogError> {
        let response = self.client.get(self.url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!(url = %self.url, %status, "catalog request failed");
            return Err(CatalogError::Status(status));
        }

        Ok(response.text().await?)
    }
}

/// Catalog held in memory.
#[derive(Debug, Clone)]
pub struct StaticCatalogSource {
    body: String,
}

impl StaticCatalogSource {
    /// Create a source that always returns `body`.
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

impl CatalogSource for StaticCatalogSource {
    async fn fetch(&self) -> Result<String, CatalogError> {
        Ok(self.body.clone())
    }
}

/// Loaded catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Decode a catalog body.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Decode`] if the body is not a JSON array of product records, or an
    /// identifier error under [`IdentifierPolicy::Require`].
    pub fn decode(body: &str, policy: IdentifierPolicy) -> Result<Self, CatalogError> {
        let records: Vec<ProductRecord> = serde_json::from_str(body)?;

        Self::from_records(records, policy)
    }

    /// Build a catalog from records, assigning identifiers according to `policy`.
    ///
    /// # Errors
    ///
    /// See [`Catalog::decode`].
    pub fn from_records(
        records: Vec<ProductRecord>,
        policy: IdentifierPolicy,
    ) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(records.len());
        let mut products = Vec::with_capacity(records.len());

        for mut record in records {
            let id = match (record.id.take(), policy) {
                (Some(id), _) => id,
                (None, IdentifierPolicy::DeriveFromName) => ProductId::from_name(&record.name),
                (None, IdentifierPolicy::Require) => {
                    return Err(CatalogError::MissingIdentifier { name: record.name });
                }
            };

            if !seen.insert(id.clone()) {
                if policy == IdentifierPolicy::Require {
                    return Err(CatalogError::DuplicateIdentifier(id));
                }

                warn!(%id, name = %record.name, "duplicate product identifier in catalog");
            }

            products.push(record.into_product(id));
        }

        Ok(Self { products })
    }

    /// Products in catalog order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by identifier. With duplicate identifiers the first match wins.
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Render every product as a card.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a price cannot be represented.
    pub fn cards(&self, currency: &'static Currency) -> Result<Vec<ProductCard>, PricingError> {
        self.products
            .iter()
            .map(|product| ProductCard::new(product, currency))
            .collect()
    }

    /// Consume the catalog, returning its products.
    pub fn into_products(self) -> Vec<Product> {
        self.products
    }
}

/// Fetch and decode the catalog.
///
/// # Errors
///
/// Propagates fetch failures and decode errors; there is no retry.
pub async fn load_catalog<S>(source: &S, policy: IdentifierPolicy) -> Result<Catalog, CatalogError>
where
    S: CatalogSource,
{
    let body = source.fetch().await?;
    let catalog = Catalog::decode(&body, policy)?;

    info!(products = catalog.len(), "catalog loaded");

    Ok(catalog)
}

/// Render model for a product in the catalog grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    /// Product identifier, carried by the "Agregar" trigger.
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Formatted unit price
    pub price: String,

    /// Discount badge, e.g. `20% OFF`
    pub badge: Option<String>,

    /// Description
    pub description: String,

    /// Image reference
    pub image: String,

    /// Alternative text for the image
    pub image_alt: String,
}

impl ProductCard {
    /// Render a product.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the price cannot be represented.
    pub fn new(product: &Product, currency: &'static Currency) -> Result<Self, PricingError> {
        let price = product.unit_price(currency)?;

        Ok(Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: format_money(&price),
            badge: product
                .discount()
                .map(|discount| format!("{}% OFF", percent_points(discount))),
            description: product.description.clone(),
            image: product.image.clone(),
            image_alt: format!("Imagen de {}", product.name),
        })
    }
}
