//! Terminal rendering

use std::{
    io::{self, Write},
    ops::Range,
};

use rusty_money::iso::Currency;
use storefront::{
    pricing::{format_money, money_from_decimal},
    prelude::*,
};
use tabled::{
    Table,
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};

use crate::errors::AppError;

fn styled(builder: Builder, numeric: Columns<Range<usize>>) -> Table {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Alignment::center());
    table.modify(numeric, Alignment::right());

    table
}

/// Write the catalog grid as a table.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_catalog(out: &mut impl Write, cards: &[ProductCard]) -> io::Result<()> {
    let mut builder = Builder::default();
    builder.push_record(["ID", "Producto", "Precio", "Oferta", "Descripción"]);

    for card in cards {
        builder.push_record([
            card.id.to_string(),
            card.name.clone(),
            card.price.clone(),
            card.badge.clone().unwrap_or_default(),
            card.description.clone(),
        ]);
    }

    writeln!(out, "{}", styled(builder, Columns::new(2..3)))
}

/// Write the cart table and its total, or the empty-cart message.
///
/// # Errors
///
/// Returns an error if a line cannot be priced or the output cannot be written.
pub fn write_cart(
    out: &mut impl Write,
    cart: &Cart,
    currency: &'static Currency,
) -> Result<(), AppError> {
    if cart.is_empty() {
        writeln!(out, "{EMPTY_CART_MESSAGE}")?;
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["ID", "Producto", "Cantidad", "Precio", "Subtotal"]);

    for line in cart.lines() {
        builder.push_record([
            line.id().to_string(),
            line.product.name.clone(),
            line.quantity.to_string(),
            format_money(&line.unit_price(currency)?),
            format_money(&line.subtotal(currency)?),
        ]);
    }

    writeln!(out, "{}", styled(builder, Columns::new(2..5)))?;
    writeln!(out, "Artículos: {}", cart.total_item_count())?;
    writeln!(out, "Total: {}", format_money(&cart.total_amount(currency)?))?;

    Ok(())
}

/// Write the admin product list.
///
/// # Errors
///
/// Returns an error if a price cannot be represented or the output cannot be written.
pub fn write_admin_products(
    out: &mut impl Write,
    products: &[AdminProduct],
    currency: &'static Currency,
) -> Result<(), AppError> {
    let mut builder = Builder::default();
    builder.push_record(["ID", "Nombre", "Precio", "Descuento", "Imagen"]);

    for product in products {
        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            format_money(&money_from_decimal(product.price, currency)?),
            format!("{}%", product.off),
            product.image_url.clone(),
        ]);
    }

    writeln!(out, "{}", styled(builder, Columns::new(2..4)))?;

    Ok(())
}

/// Write a single admin product as labelled fields.
///
/// # Errors
///
/// Returns an error if the price cannot be represented or the output cannot be written.
pub fn write_admin_product(
    out: &mut impl Write,
    product: &AdminProduct,
    currency: &'static Currency,
) -> Result<(), AppError> {
    writeln!(out, "id: {}", product.id)?;
    writeln!(out, "nombre: {}", product.name)?;
    writeln!(
        out,
        "precio: {}",
        format_money(&money_from_decimal(product.price, currency)?)
    )?;
    writeln!(out, "descuento: {}%", product.off)?;
    writeln!(out, "descripción: {}", product.description)?;
    writeln!(out, "imagen: {}", product.image_url)?;

    Ok(())
}
