//! Browser local storage

use std::{cell::RefCell, fmt, rc::Rc};

use leptos::prelude::*;
use storefront::prelude::*;
use tracing::warn;
use web_sys::wasm_bindgen::{JsCast, JsValue};

/// `window.localStorage` as a key-value store.
#[derive(Debug, Clone)]
pub struct BrowserStorage {
    storage: web_sys::Storage,
}

impl BrowserStorage {
    /// The page's local storage.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] when there is no window or storage is disabled.
    pub fn local() -> Result<Self, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("window is unavailable".to_string()))?;

        let storage = window
            .local_storage()
            .map_err(storage_error)?
            .ok_or_else(|| StorageError::Unavailable("local storage is disabled".to_string()))?;

        Ok(Self { storage })
    }
}

fn storage_error(error: JsValue) -> StorageError {
    match error.dyn_ref::<web_sys::DomException>() {
        Some(exception) if exception.name() == "QuotaExceededError" => StorageError::QuotaExceeded,
        Some(exception) => StorageError::Unavailable(exception.message()),
        None => StorageError::Unavailable(format!("{error:?}")),
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key).map_err(storage_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(storage_error)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage.remove_item(key).map_err(storage_error)
    }
}

/// Storage used by the page: local storage when the browser allows it, otherwise memory that
/// lasts until the page is closed.
#[derive(Debug, Clone)]
pub enum PageStorage {
    /// `window.localStorage`
    Local(BrowserStorage),

    /// In-memory fallback
    Memory(MemoryStore),
}

impl PageStorage {
    /// Pick the page's storage backend.
    pub fn open() -> Self {
        match BrowserStorage::local() {
            Ok(storage) => Self::Local(storage),
            Err(error) => {
                warn!(%error, "local storage unavailable; keeping data in memory");
                Self::Memory(MemoryStore::new())
            }
        }
    }
}

impl KeyValueStore for PageStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            Self::Local(storage) => storage.get(key),
            Self::Memory(storage) => storage.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            Self::Local(storage) => storage.set(key, value),
            Self::Memory(storage) => storage.set(key, value),
        }
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match self {
            Self::Local(storage) => storage.remove(key),
            Self::Memory(storage) => storage.remove(key),
        }
    }
}

/// A value that lives as long as the page and is mutated from its event handlers.
pub struct Shared<T: 'static>(StoredValue<Rc<RefCell<T>>, LocalStorage>);

impl<T: 'static> Shared<T> {
    /// Keep `value` for the lifetime of the current reactive owner.
    pub fn new(value: T) -> Self {
        Self(StoredValue::new_local(Rc::new(RefCell::new(value))))
    }

    /// Mutate the value in place.
    pub fn update<R>(&self, operation: impl FnOnce(&mut T) -> R) -> R {
        self.0.with_value(|cell| operation(&mut cell.borrow_mut()))
    }
}

impl<T: 'static> Clone for Shared<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for Shared<T> {}

/// The page's one cart store, mirrored into a signal for rendering.
pub struct CartHandle<S: 'static = PageStorage> {
    store: Shared<CartStore<S>>,
    cart: RwSignal<Cart>,
}

impl<S: KeyValueStore + 'static> CartHandle<S> {
    /// Load the cart from `storage` and publish every later change into a signal.
    ///
    /// When a write fails the store keeps its in-memory cart, so the page goes on showing and
    /// editing what the customer did even though it was not persisted.
    pub fn new(storage: S) -> Self {
        let mut store = CartStore::load(storage);
        let cart = RwSignal::new(store.cart().clone());

        store.subscribe(move |_, snapshot| cart.set(snapshot.clone()));

        Self {
            store: Shared::new(store),
            cart,
        }
    }

    /// Read the current cart, tracking it.
    pub fn with<R>(&self, read: impl FnOnce(&Cart) -> R) -> R {
        self.cart.with(read)
    }

    /// Read the current cart without tracking it.
    pub fn with_untracked<R>(&self, read: impl FnOnce(&Cart) -> R) -> R {
        self.cart.with_untracked(read)
    }

    /// Run one operation against the store.
    pub fn update<R>(&self, operation: impl FnOnce(&mut CartStore<S>) -> R) -> R {
        self.store.update(operation)
    }
}

impl CartHandle {
    /// The cart store for this page.
    pub fn open() -> Self {
        Self::new(PageStorage::open())
    }
}

impl<S: 'static> Clone for CartHandle<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: 'static> Copy for CartHandle<S> {}

impl<S: 'static> fmt::Debug for CartHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartHandle").finish_non_exhaustive()
    }
}
