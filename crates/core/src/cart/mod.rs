//! Cart

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    pricing::{self, PricingError},
    products::{Product, ProductId},
};

pub mod store;

/// Shown instead of the cart table when there are no lines.
pub const EMPTY_CART_MESSAGE: &str = "Tu carrito mágico está vacío. ¡Añade algunos productos!";

/// Thumbnail shown for a cart line whose product has no image.
pub const PLACEHOLDER_IMAGE: &str = "https://placehold.co/80x80/f7f7f7/999?text=Producto";

/// A cart line: a copy of the product taken when it was first added, and a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product fields as they were when the line was created
    #[serde(flatten)]
    pub product: Product,

    /// Units in the cart, never below one
    pub quantity: u32,
}

impl CartLine {
    /// Identifier of the product on this line.
    pub fn id(&self) -> &ProductId {
        &self.product.id
    }

    /// Thumbnail for the line, falling back to [`PLACEHOLDER_IMAGE`].
    pub fn image(&self) -> &str {
        match self.product.image.trim() {
            "" => PLACEHOLDER_IMAGE,
            image => image,
        }
    }

    /// Unit price as money.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the price cannot be represented.
    pub fn unit_price(
        &self,
        currency: &'static Currency,
    ) -> Result<Money<'static, Currency>, PricingError> {
        self.product.unit_price(currency)
    }

    /// Unit price times quantity.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the price cannot be represented or the total overflows.
    pub fn subtotal(
        &self,
        currency: &'static Currency,
    ) -> Result<Money<'static, Currency>, PricingError> {
        pricing::line_total(self.unit_price(currency)?, self.quantity)
    }
}

/// Cart
///
/// Lines are kept in insertion order and identifiers are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from decoded lines, dropping lines below quantity one and merging repeated
    /// identifiers into the first occurrence.
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::new();

        for line in lines {
            if line.quantity < 1 {
                warn!(id = %line.id(), "dropping stored cart line without quantity");
                continue;
            }

            match cart.line_mut(line.id()) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => cart.lines.push(line),
            }
        }

        cart
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for `id`, if present.
    pub fn line(&self, id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id() == id)
    }

    fn line_mut(&mut self, id: &ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.id() == id)
    }

    /// Whether there is a line for `id`.
    pub fn contains(&self, id: &ProductId) -> bool {
        self.line(id).is_some()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line quantities, shown on the cart badge.
    pub fn total_item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of all line subtotals.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a line cannot be priced or the sum overflows.
    pub fn total_amount(
        &self,
        currency: &'static Currency,
    ) -> Result<Money<'static, Currency>, PricingError> {
        let subtotals = self
            .lines
            .iter()
            .map(|line| line.subtotal(currency))
            .collect::<Result<Vec<_>, _>>()?;

        pricing::sum(subtotals, currency)
    }

    /// Add one unit of `product`, returning the line's new quantity.
    ///
    /// An existing line keeps the fields it was created with.
    pub(crate) fn add(&mut self, product: &Product) -> u32 {
        if let Some(line) = self.line_mut(&product.id) {
            line.quantity = line.quantity.saturating_add(1);
            return line.quantity;
        }

        self.lines.push(CartLine {
            product: product.clone(),
            quantity: 1,
        });

        1
    }

    /// Apply `delta` to the line for `id`.
    ///
    /// Returns `None` when there is no such line, `Some(0)` when the line was removed because its
    /// quantity fell below one, otherwise the new quantity.
    pub(crate) fn adjust(&mut self, id: &ProductId, delta: i64) -> Option<u32> {
        let position = self.lines.iter().position(|line| line.id() == id)?;
        let line = self.lines.get_mut(position)?;
        let quantity = i64::from(line.quantity).saturating_add(delta);

        if quantity < 1 {
            self.lines.remove(position);
            return Some(0);
        }

        line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        Some(line.quantity)
    }

    /// Remove the line for `id`.
    pub(crate) fn remove(&mut self, id: &ProductId) -> Option<CartLine> {
        let position = self.lines.iter().position(|line| line.id() == id)?;

        Some(self.lines.remove(position))
    }

    /// Remove every line.
    pub(crate) fn clear(&mut self) {
        self.lines.clear();
    }
}
