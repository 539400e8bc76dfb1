//! Catalog sources for the CLI

use std::path::{Path, PathBuf};

use reqwest::Url;
use storefront::prelude::*;

/// Catalog read from the local filesystem.
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    /// Source reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path this source reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for FileCatalogSource {
    async fn fetch(&self) -> Result<String, CatalogError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|error| CatalogError::Unavailable(format!("{}: {error}", self.path.display())))
    }
}

/// Catalog source selected from a location string.
#[derive(Debug, Clone)]
pub enum AppCatalogSource {
    /// Local JSON file
    File(FileCatalogSource),

    /// HTTP resource
    Http(HttpCatalogSource),
}

impl AppCatalogSource {
    /// `http://` and `https://` locations are fetched; anything else is a file path.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Unavailable`] for a malformed URL.
    pub fn from_location(location: &str) -> Result<Self, CatalogError> {
        if !(location.starts_with("http://") || location.starts_with("https://")) {
            return Ok(Self::File(FileCatalogSource::new(location)));
        }

        let url = Url::parse(location)
            .map_err(|error| CatalogError::Unavailable(format!("{location}: {error}")))?;

        Ok(Self::Http(HttpCatalogSource::new(url)))
    }
}

impl CatalogSource for AppCatalogSource {
    async fn fetch(&self) -> Result<String, CatalogError> {
        match self {
            Self::File(source) => source.fetch().await,
            Self::Http(source) => source.fetch().await,
        }
    }
}
