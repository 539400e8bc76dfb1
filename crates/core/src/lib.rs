//! Storefront
//!
//! Storefront is the domain library behind a small browser shop: a product catalog loaded from a
//! static JSON resource, a shopping cart kept in client-local key-value storage, a checkout
//! contact flow and an admin screen for maintaining the product list.

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod storage;
