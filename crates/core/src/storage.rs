//! Key-value storage
//!
//! The storefront persists everything as JSON strings under fixed keys, the way a browser's
//! local storage holds them. Writes replace the whole value; the last writer wins.

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::warn;

/// Key holding the persisted cart.
pub const CART_STORAGE_KEY: &str = "shoppingCart";

/// Key holding the admin product list.
pub const ADMIN_STORAGE_KEY: &str = "datos";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend refused the write because it is full.
    #[error("storage quota exceeded")]
    QuotaExceeded,

    /// The backend could not be reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Filesystem error in a file-backed store.
    #[error("storage I/O failed")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded or decoded.
    #[error("invalid stored JSON")]
    Json(#[from] serde_json::Error),
}

/// Synchronous string key-value storage.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value stored under `key`. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend rejects the delete.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// In-process store.
///
/// Clones share the same entries, so a second store built from a clone sees what the first one
/// wrote, like a page reload reading the same browser profile.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a value exists under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);

        Ok(())
    }
}

/// Read and decode the JSON value under `key`.
///
/// Missing values, unreadable storage and malformed JSON all yield `None`; the latter two are
/// logged.
pub fn read_json<T, S>(storage: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = match storage.get(key) {
        Ok(raw) => raw?,
        Err(error) => {
            warn!(key, %error, "failed to read storage");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(error) => {
            warn!(key, %error, "discarding malformed stored value");
            None
        }
    }
}

/// Encode `value` as JSON and store it under `key`.
///
/// # Errors
///
/// Returns a [`StorageError`] if encoding fails or the backend rejects the write.
pub fn write_json<T, S>(storage: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let encoded = serde_json::to_string(value)?;

    storage.set(key, &encoded)
}
