//! Views
//!
//! Read-only projections over the catalog and cart. Nothing in this module mutates state.

use std::{cmp::Ordering, fmt, str::FromStr};

use rusty_money::{Money, iso::Currency};

use crate::{
    cart::Cart,
    catalog::Catalog,
    forms::{CheckoutForm, is_valid_name, is_valid_phone},
    lessons::LessonRecord,
};

/// Field a catalog view is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SortField {
    /// Subject, case-insensitive
    #[default]
    Subject,

    /// Location, case-insensitive
    Location,

    /// Seat price
    Price,

    /// Available spaces
    Spaces,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SortOrder {
    /// Smallest first
    #[default]
    Asc,

    /// Largest first
    Desc,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "subject" => Ok(Self::Subject),
            "location" => Ok(Self::Location),
            "price" => Ok(Self::Price),
            "spaces" => Ok(Self::Spaces),
            other => Err(format!("unknown sort field: {other}")),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Subject => "subject",
            Self::Location => "location",
            Self::Price => "price",
            Self::Spaces => "spaces",
        })
    }
}

/// Lessons ordered by `field`.
///
/// The sort is stable, so lessons that compare equal (including strings that are equal after
/// lowercasing) keep their fetch order in both directions.
pub fn sorted_catalog(catalog: &Catalog, field: SortField, order: SortOrder) -> Vec<&LessonRecord> {
    let mut lessons: Vec<&LessonRecord> = catalog.records().collect();

    lessons.sort_by(|a, b| {
        let ordering = compare_by(a, b, field);

        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    lessons
}

fn compare_by(a: &LessonRecord, b: &LessonRecord, field: SortField) -> Ordering {
    match field {
        SortField::Subject => compare_case_insensitive(&a.subject, &b.subject),
        SortField::Location => compare_case_insensitive(&a.location, &b.location),
        SortField::Price => a.price.to_minor_units().cmp(&b.price.to_minor_units()),
        SortField::Spaces => a.spaces.cmp(&b.spaces),
    }
}

fn compare_case_insensitive(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Lessons whose subject or location contains `query`, case-insensitively, in fetch order.
///
/// A blank query matches everything.
pub fn filter_catalog<'a>(catalog: &'a Catalog, query: &str) -> Vec<&'a LessonRecord> {
    let needle = query.trim().to_lowercase();

    catalog
        .records()
        .filter(|lesson| matches_query(lesson, &needle))
        .collect()
}

pub(crate) fn matches_query(lesson: &LessonRecord, needle: &str) -> bool {
    needle.is_empty()
        || lesson.subject.to_lowercase().contains(needle)
        || lesson.location.to_lowercase().contains(needle)
}

/// Derived cart totals.
#[derive(Debug, Clone, PartialEq)]
pub struct CartTotals {
    /// Sum of price × quantity
    pub total_price: Money<'static, Currency>,

    /// Sum of quantities
    pub item_count: u32,

    /// Whether the cart has no lines
    pub is_empty: bool,
}

/// Compute the cart totals.
pub fn cart_totals(cart: &Cart, currency: &'static Currency) -> CartTotals {
    CartTotals {
        total_price: cart.total_price(currency),
        item_count: cart.item_count(),
        is_empty: cart.is_empty(),
    }
}

/// Whether the cart page can be shown.
pub fn can_view_cart(cart: &Cart) -> bool {
    !cart.is_empty()
}

/// Whether a checkout form would be accepted.
pub fn checkout_form_valid(name: &str, phone: &str) -> bool {
    is_valid_name(name) && is_valid_phone(phone)
}

impl CheckoutForm {
    /// Shortcut for [`checkout_form_valid`] on this form's fields.
    pub fn is_valid(&self) -> bool {
        checkout_form_valid(&self.name, &self.phone)
    }
}
