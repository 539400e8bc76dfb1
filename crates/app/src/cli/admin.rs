use std::io::Write;

use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use storefront::prelude::*;

use crate::{context::AppContext, errors::AppError, views};

/// Admin commands.
#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Admin operation
    #[command(subcommand)]
    pub command: AdminCommand,
}

/// Admin operations.
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// List every product
    List,

    /// Show one product
    Show {
        /// Product identifier
        id: u64,
    },

    /// Create a product
    Create(ProductArgs),

    /// Update a product; omitted fields keep their value
    Update {
        /// Product identifier
        id: u64,

        /// New field values
        #[command(flatten)]
        product: ProductUpdateArgs,
    },

    /// Delete a product
    Delete {
        /// Product identifier
        id: u64,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

/// Fields of a new product.
#[derive(Debug, Args)]
pub struct ProductArgs {
    /// Display name
    #[arg(long)]
    pub name: String,

    /// Unit price
    #[arg(long)]
    pub price: Decimal,

    /// Discount in percent points
    #[arg(long, default_value_t = 0)]
    pub off: u8,

    /// Description
    #[arg(long, default_value = "")]
    pub description: String,

    /// Image reference
    #[arg(long)]
    pub image: Option<String>,
}

impl From<ProductArgs> for ProductDraft {
    fn from(args: ProductArgs) -> Self {
        Self {
            name: args.name,
            price: args.price,
            off: args.off,
            description: args.description,
            image: args.image,
        }
    }
}

/// Fields to change on an existing product.
#[derive(Debug, Args)]
pub struct ProductUpdateArgs {
    /// Display name
    #[arg(long)]
    pub name: Option<String>,

    /// Unit price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Discount in percent points
    #[arg(long)]
    pub off: Option<u8>,

    /// Description
    #[arg(long)]
    pub description: Option<String>,

    /// Image reference
    #[arg(long)]
    pub image: Option<String>,
}

impl ProductUpdateArgs {
    fn merge(self, current: &AdminProduct) -> ProductDraft {
        ProductDraft {
            name: self.name.unwrap_or_else(|| current.name.clone()),
            price: self.price.unwrap_or(current.price),
            off: self.off.unwrap_or(current.off),
            description: self
                .description
                .unwrap_or_else(|| current.description.clone()),
            image: self.image,
        }
    }
}

pub(super) async fn run(
    args: AdminArgs,
    context: &AppContext,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let mut store = context.admin_store().await;
    let currency = store_currency();

    match args.command {
        AdminCommand::List => views::write_admin_products(out, store.products(), currency),
        AdminCommand::Show { id } => {
            let product = store.get(id).ok_or(AdminError::NotFound(id))?;

            views::write_admin_product(out, product, currency)
        }
        AdminCommand::Create(product) => {
            let created = store.create(product.into())?;

            views::write_admin_product(out, created, currency)
        }
        AdminCommand::Update { id, product } => {
            let current = store.get(id).ok_or(AdminError::NotFound(id))?;
            let draft = product.merge(current);
            let updated = store.update(id, draft)?;

            views::write_admin_product(out, updated, currency)
        }
        AdminCommand::Delete { id, yes } => {
            if !yes {
                return Err(AppError::ConfirmationRequired(id));
            }

            let removed = store.delete(id)?;

            writeln!(out, "Producto \"{}\" eliminado.", removed.name)?;

            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_keeps_omitted_fields() {
        let current = sample_products().remove(0);
        let update = ProductUpdateArgs {
            name: None,
            price: Some(Decimal::new(12000, 0)),
            off: None,
            description: None,
            image: None,
        };

        let draft = update.merge(&current);

        assert_eq!(draft.name, current.name);
        assert_eq!(draft.price, Decimal::new(12000, 0));
        assert_eq!(draft.off, 20);
        assert_eq!(draft.image, None);
    }
}
