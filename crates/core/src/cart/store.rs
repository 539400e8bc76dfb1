//! Cart store
//!
//! The store is the only writer of the cart. Each mutation updates the in-memory cart, writes the
//! whole cart back to storage and then publishes the change to every subscriber.

use std::fmt;

use rusty_money::{Money, iso::Currency};
use tracing::{debug, warn};

use crate::{
    cart::{Cart, CartLine},
    pricing::{PricingError, store_currency},
    products::{Product, ProductId},
    storage::{CART_STORAGE_KEY, KeyValueStore, StorageError, read_json, write_json},
};

/// Read the persisted cart.
///
/// A missing record, unreadable storage or a malformed record all give an empty cart.
pub fn get_cart<S>(storage: &S) -> Cart
where
    S: KeyValueStore + ?Sized,
{
    read_json::<Vec<CartLine>, _>(storage, CART_STORAGE_KEY)
        .map(Cart::from_lines)
        .unwrap_or_default()
}

/// Direction of a quantity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// Add one unit.
    Increment,

    /// Take one unit away; the line is removed when it reaches zero.
    Decrement,
}

impl QuantityChange {
    fn delta(self) -> i64 {
        match self {
            Self::Increment => 1,
            Self::Decrement => -1,
        }
    }
}

/// Change published after a store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// The cart was re-read from storage.
    Loaded,

    /// A product was added; `quantity` is the line's new quantity.
    Added {
        /// Product identifier
        id: ProductId,
        /// New quantity
        quantity: u32,
    },

    /// A line's quantity changed.
    QuantityChanged {
        /// Product identifier
        id: ProductId,
        /// New quantity
        quantity: u32,
    },

    /// A line was removed.
    Removed {
        /// Product identifier
        id: ProductId,
    },

    /// Every line was removed.
    Cleared,

    /// The operation addressed a product that is not in the cart.
    Unchanged,
}

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&CartEvent, &Cart)>;

/// Cart store backed by key-value storage.
pub struct CartStore<S> {
    storage: S,
    cart: Cart,
    currency: &'static Currency,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S> fmt::Debug for CartStore<S>
where
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("storage", &self.storage)
            .field("cart", &self.cart)
            .field("currency", &self.currency.iso_alpha_code)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStore> CartStore<S> {
    /// Hydrate a store from `storage`.
    pub fn load(storage: S) -> Self {
        let cart = get_cart(&storage);

        debug!(lines = cart.len(), "cart loaded");

        Self {
            storage,
            cart,
            currency: store_currency(),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Use a different currency for totals.
    #[must_use]
    pub fn with_currency(mut self, currency: &'static Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Current cart snapshot.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Backing storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Currency used for totals.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Register a listener called after every mutation with the change and the new cart.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&CartEvent, &Cart) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription = self.next_subscription.saturating_add(1);
        self.listeners.push((id, Box::new(listener)));

        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);

        self.listeners.len() != before
    }

    /// Discard the in-memory cart and read the persisted one again.
    pub fn reload(&mut self) -> &Cart {
        self.cart = get_cart(&self.storage);
        self.publish(&CartEvent::Loaded);

        &self.cart
    }

    /// Add one unit of `product`.
    ///
    /// A new line copies the whole product; an existing line only has its quantity raised.
    pub fn add_item(&mut self, product: &Product) -> CartEvent {
        let quantity = self.cart.add(product);

        debug!(id = %product.id, quantity, "added product to cart");

        self.commit(CartEvent::Added {
            id: product.id.clone(),
            quantity,
        })
    }

    /// Raise or lower the quantity of the line for `id`.
    ///
    /// A line that drops below one unit is removed. Unknown identifiers are ignored.
    pub fn change_quantity(&mut self, id: &ProductId, change: QuantityChange) -> CartEvent {
        let event = match self.cart.adjust(id, change.delta()) {
            None => return CartEvent::Unchanged,
            Some(0) => CartEvent::Removed { id: id.clone() },
            Some(quantity) => CartEvent::QuantityChanged {
                id: id.clone(),
                quantity,
            },
        };

        debug!(%id, ?change, "changed cart quantity");

        self.commit(event)
    }

    /// Remove the line for `id`. Unknown identifiers are ignored.
    pub fn remove_item(&mut self, id: &ProductId) -> CartEvent {
        if self.cart.remove(id).is_none() {
            return CartEvent::Unchanged;
        }

        debug!(%id, "removed product from cart");

        self.commit(CartEvent::Removed { id: id.clone() })
    }

    /// Empty the cart and delete the persisted record.
    pub fn clear(&mut self) -> CartEvent {
        self.cart.clear();

        if let Err(error) = self.storage.remove(CART_STORAGE_KEY) {
            warn!(%error, "failed to delete stored cart; keeping in-memory state");
        }

        debug!("cleared cart");

        self.publish(&CartEvent::Cleared);

        CartEvent::Cleared
    }

    /// Sum of all line quantities.
    pub fn total_item_count(&self) -> u64 {
        self.cart.total_item_count()
    }

    /// Sum of all line subtotals.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a line cannot be priced.
    pub fn total_amount(&self) -> Result<Money<'static, Currency>, PricingError> {
        self.cart.total_amount(self.currency)
    }

    fn commit(&mut self, event: CartEvent) -> CartEvent {
        if let Err(error) = self.persist() {
            warn!(%error, "failed to persist cart; keeping in-memory state");
        }

        self.publish(&event);

        event
    }

    fn persist(&self) -> Result<(), StorageError> {
        write_json(&self.storage, CART_STORAGE_KEY, &self.cart)
    }

    fn publish(&mut self, event: &CartEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event, &self.cart);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use rust_decimal::Decimal;
    use rusty_money::iso;
    use testresult::TestResult;

    use crate::storage::{MemoryStore, MockKeyValueStore};

    use super::*;

    fn product(id: &str, price: i64) -> Product {
        Product {
            id: ProductId::from(id),
            name: format!("Product {id}"),
            price: Decimal::new(price, 0),
            off: 0,
            description: String::new(),
            image: String::new(),
        }
    }

    #[test]
    fn malformed_record_loads_as_empty_cart() -> TestResult {
        let storage = MemoryStore::new();
        storage.set(CART_STORAGE_KEY, "[{\"id\": ")?;

        let store = CartStore::load(storage);

        assert!(store.cart().is_empty());

        Ok(())
    }

    #[test]
    fn mutations_are_persisted() -> TestResult {
        let storage = MemoryStore::new();
        let mut store = CartStore::load(storage.clone());

        store.add_item(&product("A", 10));

        let stored = storage.get(CART_STORAGE_KEY)?.ok_or("cart not stored")?;
        let lines: Vec<CartLine> = serde_json::from_str(&stored)?;

        assert_eq!(lines.len(), 1);

        Ok(())
    }

    #[test]
    fn subscribers_receive_every_change() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut store = CartStore::load(MemoryStore::new());
        store.subscribe(move |event, cart| {
            sink.borrow_mut().push((event.clone(), cart.total_item_count()));
        });

        let a = product("A", 10);
        store.add_item(&a);
        store.change_quantity(&a.id, QuantityChange::Increment);
        store.change_quantity(&ProductId::from("missing"), QuantityChange::Increment);
        store.remove_item(&a.id);
        store.clear();

        assert_eq!(
            *seen.borrow(),
            vec![
                (
                    CartEvent::Added {
                        id: a.id.clone(),
                        quantity: 1
                    },
                    1
                ),
                (
                    CartEvent::QuantityChanged {
                        id: a.id.clone(),
                        quantity: 2
                    },
                    2
                ),
                (CartEvent::Removed { id: a.id.clone() }, 0),
                (CartEvent::Cleared, 0),
            ]
        );
    }

    #[test]
    fn unsubscribed_listeners_stop_receiving() {
        let calls = Rc::new(RefCell::new(0_u32));
        let counter = Rc::clone(&calls);

        let mut store = CartStore::load(MemoryStore::new());
        let id = store.subscribe(move |_, _| *counter.borrow_mut() += 1);

        store.add_item(&product("A", 10));

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));

        store.add_item(&product("A", 10));

        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn write_failure_keeps_in_memory_state() -> TestResult {
        let mut storage = MockKeyValueStore::new();
        storage.expect_get().returning(|_| Ok(None));
        storage
            .expect_set()
            .returning(|_, _| Err(StorageError::QuotaExceeded));

        let mut store = CartStore::load(storage);
        let a = product("A", 1000);

        store.add_item(&a);
        store.add_item(&a);

        assert_eq!(store.total_item_count(), 2);
        assert_eq!(
            store.total_amount()?,
            Money::from_minor(2000_00, iso::ARS)
        );

        Ok(())
    }

    #[test]
    fn clear_removes_record_even_when_empty() {
        let mut storage = MockKeyValueStore::new();
        storage.expect_get().returning(|_| Ok(None));
        storage
            .expect_remove()
            .times(1)
            .returning(|_| Ok(()));

        let mut store = CartStore::load(storage);

        assert_eq!(store.clear(), CartEvent::Cleared);
    }
}
