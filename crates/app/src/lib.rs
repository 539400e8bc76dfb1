//! Storefront command-line application: catalog, cart, checkout and admin commands over a
//! file-backed store.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod context;
pub mod errors;
pub mod observability;
pub mod storage;
pub mod views;
