//! CLI commands

use std::io::Write;

use clap::Subcommand;

use crate::{context::AppContext, errors::AppError};

mod admin;
mod cart;
mod catalog;
mod checkout;

pub use admin::{AdminArgs, AdminCommand, ProductArgs, ProductUpdateArgs};
pub use cart::{CartArgs, CartCommand};
pub use checkout::CheckoutArgs;

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the catalog
    Catalog,

    /// Show or change the cart
    Cart(CartArgs),

    /// Send contact details and empty the cart
    Checkout(CheckoutArgs),

    /// Maintain the admin product list
    Admin(AdminArgs),
}

/// Run `command`, writing its output to `out`.
///
/// # Errors
///
/// Returns an [`AppError`] when the command fails.
pub async fn run(
    command: Command,
    context: &AppContext,
    out: &mut impl Write,
) -> Result<(), AppError> {
    match command {
        Command::Catalog => catalog::run(context, out).await,
        Command::Cart(args) => cart::run(args, context, out).await,
        Command::Checkout(args) => checkout::run(args, context, out),
        Command::Admin(args) => admin::run(args, context, out).await,
    }
}
