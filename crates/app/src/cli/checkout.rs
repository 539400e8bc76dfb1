use std::io::Write;

use clap::Args;
use storefront::prelude::*;

use crate::{context::AppContext, errors::AppError};

/// Checkout contact details.
#[derive(Debug, Args)]
pub struct CheckoutArgs {
    /// Phone number to be contacted at
    #[arg(long)]
    pub phone: String,

    /// Optional email address
    #[arg(long)]
    pub email: Option<String>,
}

pub(super) fn run(
    args: CheckoutArgs,
    context: &AppContext,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let mut store = context.cart_store();
    let mut checkout = Checkout::new();

    checkout.open(store.cart())?;

    let form = ContactForm {
        phone: args.phone,
        email: args.email,
    };

    let confirmation = checkout.submit(&form, &mut store)?;

    writeln!(out, "{}", confirmation.message())?;

    Ok(())
}
