//! Pricing
//!
//! Conversions between decimal amounts, minor units and [`Money`].

use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};

/// Look up one of the supported currencies by ISO code.
pub fn currency_from_code(code: &str) -> Option<&'static Currency> {
    match code.trim().to_ascii_uppercase().as_str() {
        "GBP" => Some(GBP),
        "USD" => Some(USD),
        "EUR" => Some(EUR),
        _ => None,
    }
}

/// Convert a decimal major-unit amount into minor units, rounding to the nearest unit.
pub fn minor_units(amount: Decimal) -> Option<i64> {
    amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
}

/// Convert a floating point major-unit amount into minor units.
///
/// Non-finite and negative amounts yield `None`.
pub fn minor_units_from_f64(amount: f64) -> Option<i64> {
    if !amount.is_finite() || amount < 0.0 {
        return None;
    }

    Decimal::from_f64(amount).and_then(minor_units)
}

/// Major-unit decimal amount for a money value, e.g. 1999 pence -> 19.99.
pub fn major_units(money: &Money<'_, Currency>) -> Decimal {
    Decimal::new(money.to_minor_units(), 2)
}

/// Build a money value from a decimal amount, treating unusable amounts as zero.
pub fn money_or_zero(amount: Option<Decimal>, currency: &'static Currency) -> Money<'static, Currency> {
    let minor = amount
        .filter(|value| !value.is_sign_negative())
        .and_then(minor_units)
        .unwrap_or(0);

    Money::from_minor(minor, currency)
}
