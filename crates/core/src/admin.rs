//! Admin
//!
//! Product maintenance for the admin screen. The list lives under its own storage key, separate
//! from the catalog resource, and uses integer identifiers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    catalog::{CatalogError, CatalogSource},
    products::{Product, ProductId, ProductRecord},
    storage::{ADMIN_STORAGE_KEY, KeyValueStore, read_json, write_json},
};

/// Image used when a new product is created without one.
pub const DEFAULT_IMAGE: &str = "default.jpg";

/// Admin errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdminError {
    /// No product has the given identifier.
    #[error("product {0} not found")]
    NotFound(u64),

    /// The product name was blank.
    #[error("product name is required")]
    MissingName,

    /// The price was below zero.
    #[error("price {0} is negative")]
    NegativePrice(Decimal),

    /// The discount was above 100 percent.
    #[error("discount {0}% is above 100%")]
    DiscountOutOfRange(u8),
}

/// A product as kept by the admin screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProduct {
    /// Integer identifier
    pub id: u64,

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
    #[serde(default, rename = "imageUrl", alias = "image")]
    pub image_url: String,
}

impl AdminProduct {
    /// The product as the storefront sees it.
    pub fn to_product(&self) -> Product {
        Product {
            id: ProductId::Number(self.id),
            name: self.name.clone(),
            price: self.price,
            off: self.off,
            description: self.description.clone(),
            image: self.image_url.clone(),
        }
    }
}

/// Fields submitted from the create/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    /// Display name
    pub name: String,

    /// Unit price in major units
    pub price: Decimal,

    /// Discount in percent points
    pub off: u8,

    /// Product description
    pub description: String,

    /// Newly chosen image, if any
    pub image: Option<String>,
}

impl ProductDraft {
    fn validate(&self) -> Result<(), AdminError> {
        if self.name.trim().is_empty() {
            return Err(AdminError::MissingName);
        }

        if self.price.is_sign_negative() && !self.price.is_zero() {
            return Err(AdminError::NegativePrice(self.price));
        }

        if self.off > 100 {
            return Err(AdminError::DiscountOutOfRange(self.off));
        }

        Ok(())
    }

    fn image(&self) -> Option<&str> {
        self.image
            .as_deref()
            .map(str::trim)
            .filter(|image| !image.is_empty())
    }
}

/// Products offered when neither the stored list nor the catalog can be read.
pub fn sample_products() -> Vec<AdminProduct> {
    vec![
        AdminProduct {
            id: 1,
            name: "Vasos Personalizados".to_string(),
            price: Decimal::new(15000, 0),
            off: 20,
            description: "Vasos personalizados con lo que vos mas ames.".to_string(),
            image_url: "VasosPersonalizados.jpg".to_string(),
        },
        AdminProduct {
            id: 2,
            name: "Cono de Helado Mágico".to_string(),
            price: Decimal::new(800, 0),
            off: 0,
            description: "Un cono de helado con chispas de colores.".to_string(),
            image_url: "HeladoMagico.jpg".to_string(),
        },
    ]
}

/// Number catalog records for the admin list.
///
/// Integer identifiers are kept; every other record gets the next number after the largest one
/// seen so far, in catalog order.
fn number_records(records: Vec<ProductRecord>) -> Vec<AdminProduct> {
    let mut next = records
        .iter()
        .filter_map(|record| match record.id {
            Some(ProductId::Number(id)) => Some(id),
            _ => None,
        })
        .max()
        .map_or(1, |max| max.saturating_add(1));

    records
        .into_iter()
        .map(|record| {
            let id = if let Some(ProductId::Number(id)) = record.id {
                id
            } else {
                let id = next;
                next = next.saturating_add(1);
                id
            };

            AdminProduct {
                id,
                name: record.name,
                price: record.price,
                off: record.off,
                description: record.description,
                image_url: record.image,
            }
        })
        .collect()
}

fn next_id_after(products: &[AdminProduct]) -> u64 {
    products
        .iter()
        .map(|product| product.id)
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

/// Admin product list backed by key-value storage.
#[derive(Debug)]
pub struct AdminStore<S> {
    storage: S,
    products: Vec<AdminProduct>,
    next_id: u64,
}

impl<S: KeyValueStore> AdminStore<S> {
    /// Read the stored list. Returns the storage back when there is no usable list.
    ///
    /// # Errors
    ///
    /// Gives `storage` back when nothing is stored or the stored value is malformed.
    pub fn load(storage: S) -> Result<Self, S> {
        match read_json::<Vec<AdminProduct>, _>(&storage, ADMIN_STORAGE_KEY) {
            Some(products) => {
                info!(products = products.len(), "admin products loaded from storage");
                Ok(Self::with_products(storage, products))
            }
            None => Err(storage),
        }
    }

    /// Read the stored list, seeding it from `source` the first time.
    ///
    /// When the catalog cannot be read the sample products are used instead. Seeded lists are
    /// written back immediately.
    pub async fn open<C>(storage: S, source: &C) -> Self
    where
        C: CatalogSource,
    {
        let storage = match Self::load(storage) {
            Ok(store) => return store,
            Err(storage) => storage,
        };

        let products = match seed(source).await {
            Ok(products) => {
                info!(products = products.len(), "admin products seeded from catalog");
                products
            }
            Err(error) => {
                warn!(%error, "failed to seed admin products; using samples");
                sample_products()
            }
        };

        let store = Self::with_products(storage, products);
        store.persist();

        store
    }

    fn with_products(storage: S, products: Vec<AdminProduct>) -> Self {
        let next_id = next_id_after(&products);

        Self {
            storage,
            products,
            next_id,
        }
    }

    /// Products in list order.
    pub fn products(&self) -> &[AdminProduct] {
        &self.products
    }

    /// The product with `id`, if any.
    pub fn get(&self, id: u64) -> Option<&AdminProduct> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Identifier the next created product will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Backing storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Add a product from `draft`.
    ///
    /// # Errors
    ///
    /// Returns an [`AdminError`] if the draft is invalid.
    pub fn create(&mut self, draft: ProductDraft) -> Result<&AdminProduct, AdminError> {
        draft.validate()?;

        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);

        let image_url = draft.image().unwrap_or(DEFAULT_IMAGE).to_string();

        self.products.push(AdminProduct {
            id,
            name: draft.name,
            price: draft.price,
            off: draft.off,
            description: draft.description,
            image_url,
        });

        debug!(id, "created admin product");

        self.persist();

        self.get(id).ok_or(AdminError::NotFound(id))
    }

    /// Replace the fields of product `id` with `draft`. Without a new image the current one stays.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotFound`] for an unknown identifier, or a validation error.
    pub fn update(&mut self, id: u64, draft: ProductDraft) -> Result<&AdminProduct, AdminError> {
        draft.validate()?;

        let image = draft.image().map(str::to_string);
        let product = self
            .products
            .iter_mut()
            .find(|product| product.id == id)
            .ok_or(AdminError::NotFound(id))?;

        product.name = draft.name;
        product.price = draft.price;
        product.off = draft.off;
        product.description = draft.description;

        if let Some(image) = image {
            product.image_url = image;
        }

        debug!(id, "updated admin product");

        self.persist();

        self.get(id).ok_or(AdminError::NotFound(id))
    }

    /// Remove product `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotFound`] for an unknown identifier.
    pub fn delete(&mut self, id: u64) -> Result<AdminProduct, AdminError> {
        let position = self
            .products
            .iter()
            .position(|product| product.id == id)
            .ok_or(AdminError::NotFound(id))?;

        let removed = self.products.remove(position);

        debug!(id, "deleted admin product");

        self.persist();

        Ok(removed)
    }

    fn persist(&self) {
        if let Err(error) = write_json(&self.storage, ADMIN_STORAGE_KEY, &self.products) {
            warn!(%error, "failed to persist admin products; keeping in-memory state");
        }
    }
}

async fn seed<C: CatalogSource>(source: &C) -> Result<Vec<AdminProduct>, CatalogError> {
    let body = source.fetch().await?;
    let records: Vec<ProductRecord> = serde_json::from_str(&body)?;

    Ok(number_records(records))
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use testresult::TestResult;

    use crate::{catalog::StaticCatalogSource, storage::MemoryStore};

    use super::*;

    struct FailingSource;

    impl CatalogSource for FailingSource {
        async fn fetch(&self) -> Result<String, CatalogError> {
            Err(CatalogError::Status(StatusCode::NOT_FOUND))
        }
    }

    fn draft(name: &str, image: Option<&str>) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            price: Decimal::new(1200, 0),
            off: 10,
            description: "Taza.".to_string(),
            image: image.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn open_seeds_from_catalog_and_persists() -> TestResult {
        let storage = MemoryStore::new();
        let source = StaticCatalogSource::new(
            r#"[
                {"name": "Vasos", "price": 15000, "off": 20, "description": "", "image": "v.jpg"},
                {"id": 4, "name": "Cono", "price": 800, "off": 0, "description": "", "image": "c.jpg"},
                {"id": "taza", "name": "Taza", "price": 10}
            ]"#,
        );

        let store = AdminStore::open(storage.clone(), &source).await;

        let ids: Vec<_> = store.products().iter().map(|product| product.id).collect();

        assert_eq!(ids, vec![5, 4, 6]);
        assert_eq!(store.next_id(), 7);
        assert!(storage.contains(ADMIN_STORAGE_KEY));

        let stored = storage.get(ADMIN_STORAGE_KEY)?.ok_or("admin list not stored")?;

        assert!(stored.contains("\"imageUrl\":\"v.jpg\""), "stored: {stored}");

        Ok(())
    }

    #[tokio::test]
    async fn open_falls_back_to_samples() {
        let store = AdminStore::open(MemoryStore::new(), &FailingSource).await;

        assert_eq!(store.products(), sample_products().as_slice());
        assert_eq!(store.next_id(), 3);
    }

    #[tokio::test]
    async fn open_prefers_stored_list() -> TestResult {
        let storage = MemoryStore::new();
        storage.set(
            ADMIN_STORAGE_KEY,
            r#"[{"id": 9, "name": "Taza", "price": 10.5, "off": 0, "description": "", "imageUrl": "t.jpg"}]"#,
        )?;

        let store = AdminStore::open(storage, &FailingSource).await;

        assert_eq!(store.products().len(), 1);
        assert_eq!(store.get(9).map(|p| p.price), Some(Decimal::new(105, 1)));
        assert_eq!(store.next_id(), 10);

        Ok(())
    }

    #[tokio::test]
    async fn malformed_stored_list_is_reseeded() -> TestResult {
        let storage = MemoryStore::new();
        storage.set(ADMIN_STORAGE_KEY, "[{\"id\": ")?;

        let store = AdminStore::open(storage, &FailingSource).await;

        assert_eq!(store.products().len(), 2);

        Ok(())
    }

    #[test]
    fn load_without_stored_list_returns_storage() {
        assert!(AdminStore::load(MemoryStore::new()).is_err());
    }

    #[test]
    fn create_assigns_ids_and_default_image() -> TestResult {
        let storage = MemoryStore::new();
        storage.set(ADMIN_STORAGE_KEY, "[]")?;
        let Ok(mut store) = AdminStore::load(storage) else {
            panic!("expected stored list");
        };

        let first = store.create(draft("Taza", None))?.clone();
        let second = store.create(draft("Plato", Some("plato.jpg")))?.clone();

        assert_eq!(first.id, 1);
        assert_eq!(first.image_url, DEFAULT_IMAGE);
        assert_eq!(second.id, 2);
        assert_eq!(second.image_url, "plato.jpg");

        Ok(())
    }

    #[test]
    fn ids_are_not_reused_after_delete() -> TestResult {
        let storage = MemoryStore::new();
        write_json(&storage, ADMIN_STORAGE_KEY, &sample_products())?;
        let Ok(mut store) = AdminStore::load(storage.clone()) else {
            panic!("expected stored list");
        };

        store.delete(2)?;
        let created = store.create(draft("Taza", None))?.id;

        assert_eq!(created, 3);

        let reloaded: Vec<AdminProduct> =
            read_json(&storage, ADMIN_STORAGE_KEY).ok_or("admin list not stored")?;
        let ids: Vec<_> = reloaded.iter().map(|product| product.id).collect();

        assert_eq!(ids, vec![1, 3]);

        Ok(())
    }

    #[test]
    fn update_keeps_image_when_none_given() -> TestResult {
        let storage = MemoryStore::new();
        write_json(&storage, ADMIN_STORAGE_KEY, &sample_products())?;
        let Ok(mut store) = AdminStore::load(storage) else {
            panic!("expected stored list");
        };

        let updated = store.update(1, draft("Vasos", None))?;

        assert_eq!(updated.name, "Vasos");
        assert_eq!(updated.off, 10);
        assert_eq!(updated.image_url, "VasosPersonalizados.jpg");

        Ok(())
    }

    #[test]
    fn unknown_ids_are_reported() -> TestResult {
        let storage = MemoryStore::new();
        write_json(&storage, ADMIN_STORAGE_KEY, &sample_products())?;
        let Ok(mut store) = AdminStore::load(storage) else {
            panic!("expected stored list");
        };

        assert_eq!(
            store.update(42, draft("Taza", None)).err(),
            Some(AdminError::NotFound(42))
        );
        assert_eq!(store.delete(42).err(), Some(AdminError::NotFound(42)));

        Ok(())
    }

    #[test]
    fn drafts_are_validated() -> TestResult {
        let storage = MemoryStore::new();
        storage.set(ADMIN_STORAGE_KEY, "[]")?;
        let Ok(mut store) = AdminStore::load(storage) else {
            panic!("expected stored list");
        };

        let mut negative = draft("Taza", None);
        negative.price = Decimal::new(-1, 0);

        assert_eq!(
            store.create(draft("  ", None)).err(),
            Some(AdminError::MissingName)
        );
        assert_eq!(
            store.create(negative).err(),
            Some(AdminError::NegativePrice(Decimal::new(-1, 0)))
        );
        assert!(store.products().is_empty());

        Ok(())
    }
}
