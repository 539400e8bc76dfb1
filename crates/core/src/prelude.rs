//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    admin::{AdminError, AdminProduct, AdminStore, DEFAULT_IMAGE, ProductDraft, sample_products},
    cart::{
        Cart, CartLine, EMPTY_CART_MESSAGE, PLACEHOLDER_IMAGE,
        store::{CartEvent, CartStore, QuantityChange, SubscriptionId, get_cart},
    },
    catalog::{
        Catalog, CatalogError, CatalogSource, HttpCatalogSource, IdentifierPolicy, ProductCard,
        StaticCatalogSource, load_catalog,
    },
    checkout::{
        AUTO_CLOSE_DELAY, Checkout, CheckoutError, CheckoutState, Confirmation,
        contact::{ContactField, ContactForm, ValidationError, ValidationReason},
    },
    pricing::{PricingError, format_money, store_currency},
    products::{Product, ProductId, ProductRecord},
    storage::{
        ADMIN_STORAGE_KEY, CART_STORAGE_KEY, KeyValueStore, MemoryStore, StorageError,
    },
};
