//! Pricing
//!
//! Prices travel as decimals in major units and are handled as [`Money`] in minor units once
//! they enter the cart. Arithmetic is limited to multiplying unit prices by quantities and
//! summing the results.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{
    Formatter, Money, MoneyError, Params, Position,
    iso::{self, Currency},
};
use thiserror::Error;

/// Errors that can occur while pricing cart lines.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A price was below zero.
    #[error("price {0} is negative")]
    NegativePrice(Decimal),

    /// A price or line total did not fit in minor units.
    #[error("amount overflowed minor units")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Currency the storefront sells in.
pub fn store_currency() -> &'static Currency {
    iso::ARS
}

/// Convert a major-unit decimal amount into minor units.
///
/// # Errors
///
/// Returns [`PricingError::NegativePrice`] for amounts below zero and
/// [`PricingError::Overflow`] when the amount does not fit in an `i64` of minor units.
pub fn to_minor_units(amount: Decimal) -> Result<i64, PricingError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(PricingError::NegativePrice(amount));
    }

    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|value| value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|value| value.to_i64())
        .ok_or(PricingError::Overflow)
}

/// Build money from a major-unit decimal amount.
///
/// # Errors
///
/// See [`to_minor_units`].
pub fn money_from_decimal(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    Ok(Money::from_minor(to_minor_units(amount)?, currency))
}

/// Multiply a unit price by a quantity.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the product does not fit in minor units.
pub fn line_total(
    unit_price: Money<'static, Currency>,
    quantity: u32,
) -> Result<Money<'static, Currency>, PricingError> {
    let total_minor = unit_price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(total_minor, unit_price.currency()))
}

/// Sum a sequence of amounts, starting from zero in the given currency.
///
/// # Errors
///
/// Returns [`PricingError::Money`] when an amount is in a different currency.
pub fn sum<I>(
    amounts: I,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError>
where
    I: IntoIterator<Item = Money<'static, Currency>>,
{
    amounts
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |total, amount| {
            total.add(amount)
        })
        .map_err(PricingError::from)
}

/// Format money the way the storefront displays prices (`$ 15.000,00`).
pub fn format_money(money: &Money<'_, Currency>) -> String {
    Formatter::money(
        money,
        Params {
            digit_separator: '.',
            exponent_separator: ',',
            separator_pattern: &[3, 3, 3, 3, 3, 3],
            positions: &[Position::Sign, Position::Symbol, Position::Space, Position::Amount],
            rounding: Some(2),
            symbol: Some("$"),
            code: None,
        },
    )
}

/// Converts a fractional percentage to whole percent points for display.
pub fn percent_points(percentage: Percentage) -> Decimal {
    // `Percentage` is a fraction (e.g. 0.2), so multiply by 100 to get percent points.
    ((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED)
        .round_dp(2)
        .normalize()
}
