use std::io::Write;

use storefront::pricing::store_currency;
use tracing::warn;

use crate::{context::AppContext, errors::AppError, views};

pub(super) async fn run(context: &AppContext, out: &mut impl Write) -> Result<(), AppError> {
    let catalog = context
        .catalog()
        .await
        .inspect_err(|error| warn!(%error, "failed to load catalog"))?;

    let cards = catalog.cards(store_currency())?;

    views::write_catalog(out, &cards)?;

    Ok(())
}
