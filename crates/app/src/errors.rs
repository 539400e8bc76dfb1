//! Application errors

use std::io;

use storefront::prelude::*;
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum AppError {
    /// The catalog could not be loaded; shows the storefront's fallback message.
    #[error("{}", .0.fallback_message())]
    Catalog(#[from] CatalogError),

    /// Checkout was refused.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// An admin operation was refused.
    #[error(transparent)]
    Admin(#[from] AdminError),

    /// A price could not be computed.
    #[error("failed to price the cart: {0}")]
    Pricing(#[from] PricingError),

    /// The product is not in the catalog.
    #[error("product {0} is not in the catalog")]
    UnknownProduct(ProductId),

    /// A delete was requested without confirmation.
    #[error("refusing to delete product {0} without --yes")]
    ConfirmationRequired(u64),

    /// Output could not be written.
    #[error("failed to write output")]
    Output(#[from] io::Error),

    /// The logging subscriber could not be installed.
    #[error("failed to initialise logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}
