//! App Context

use storefront::prelude::*;

use crate::{catalog::AppCatalogSource, config::StoreConfig, storage::FileStore};

/// Storage and catalog shared by every command.
#[derive(Debug, Clone)]
pub struct AppContext {
    storage: FileStore,
    catalog: AppCatalogSource,
    policy: IdentifierPolicy,
}

impl AppContext {
    /// Assemble a context from its parts.
    pub fn new(storage: FileStore, catalog: AppCatalogSource, policy: IdentifierPolicy) -> Self {
        Self {
            storage,
            catalog,
            policy,
        }
    }

    /// Build application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog location is a malformed URL.
    pub fn from_config(config: &StoreConfig) -> Result<Self, CatalogError> {
        Ok(Self::new(
            FileStore::new(&config.data_dir),
            AppCatalogSource::from_location(&config.catalog)?,
            config.identifier_policy(),
        ))
    }

    /// Backing storage.
    pub fn storage(&self) -> &FileStore {
        &self.storage
    }

    /// Fetch and decode the catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] when the catalog cannot be loaded.
    pub async fn catalog(&self) -> Result<Catalog, CatalogError> {
        load_catalog(&self.catalog, self.policy).await
    }

    /// Cart store over the persisted cart.
    pub fn cart_store(&self) -> CartStore<FileStore> {
        CartStore::load(self.storage.clone())
    }

    /// Admin store, seeded from the catalog on first use.
    pub async fn admin_store(&self) -> AdminStore<FileStore> {
        AdminStore::open(self.storage.clone(), &self.catalog).await
    }
}
