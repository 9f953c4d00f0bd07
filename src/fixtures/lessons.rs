//! Lesson Fixtures

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    lessons::LessonRecord,
    pricing::{currency_from_code, minor_units},
};

/// Wrapper for lessons in YAML
#[derive(Debug, Deserialize)]
pub struct LessonsFixture {
    /// Lessons, in catalog order
    pub lessons: Vec<LessonFixture>,
}

/// Lesson Fixture
#[derive(Debug, Deserialize)]
pub struct LessonFixture {
    /// Lesson id
    pub id: String,

    /// Lesson subject
    pub subject: String,

    /// Lesson location
    pub location: String,

    /// Seat price (e.g., "20.00 GBP")
    pub price: String,

    /// Available seats
    pub spaces: u32,
}

impl TryFrom<LessonFixture> for LessonRecord {
    type Error = FixtureError;

    fn try_from(fixture: LessonFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;

        Ok(LessonRecord::new(
            fixture.id,
            fixture.subject,
            fixture.location,
            Money::from_minor(minor_units, currency),
            fixture.spaces,
        ))
    }
}

/// Parse price string (e.g., "20.00 GBP") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a non-negative decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    let minor_units = minor_units(amount).ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = currency_from_code(currency_code)
        .ok_or_else(|| FixtureError::UnknownCurrency((*currency_code).to_string()))?;

    Ok((minor_units, currency))
}
