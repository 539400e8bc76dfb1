use std::io::Write;

use clap::{Args, Subcommand};
use storefront::prelude::*;
use tracing::warn;

use crate::{context::AppContext, errors::AppError, views};

/// Cart commands.
#[derive(Debug, Args)]
pub struct CartArgs {
    /// Cart operation
    #[command(subcommand)]
    pub command: CartCommand,
}

/// Cart operations.
#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Show the cart
    Show,

    /// Add one unit of a catalog product
    Add {
        /// Product identifier
        id: ProductId,
    },

    /// Add one unit to a cart line
    Increment {
        /// Product identifier
        id: ProductId,
    },

    /// Take one unit from a cart line, removing it at zero
    Decrement {
        /// Product identifier
        id: ProductId,
    },

    /// Remove a cart line
    Remove {
        /// Product identifier
        id: ProductId,
    },

    /// Empty the cart
    Clear,
}

pub(super) async fn run(
    args: CartArgs,
    context: &AppContext,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let mut store = context.cart_store();

    let event = match args.command {
        CartCommand::Show => None,
        CartCommand::Add { id } => {
            let catalog = context
                .catalog()
                .await
                .inspect_err(|error| warn!(%error, "failed to load catalog"))?;
            let product = catalog.get(&id).ok_or(AppError::UnknownProduct(id))?;

            Some(store.add_item(product))
        }
        CartCommand::Increment { id } => {
            Some(store.change_quantity(&id, QuantityChange::Increment))
        }
        CartCommand::Decrement { id } => {
            Some(store.change_quantity(&id, QuantityChange::Decrement))
        }
        CartCommand::Remove { id } => Some(store.remove_item(&id)),
        CartCommand::Clear => Some(store.clear()),
    };

    if event == Some(CartEvent::Unchanged) {
        writeln!(out, "El producto no está en el carrito.")?;
    }

    views::write_cart(out, store.cart(), store.currency())
}
