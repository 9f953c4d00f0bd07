//! Render
//!
//! Terminal tables for the catalog, the cart and a placed order.

use std::io;

use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{cart::Cart, lessons::LessonRecord, orders::OrderDraft};

/// Errors that can occur when rendering a table.
#[derive(Debug, Error)]
pub enum RenderError {
    /// IO error
    #[error("IO error")]
    IO,
}

/// Writes the given lessons as a table, in the order given.
///
/// The last column shows how many seats of each lesson `cart` holds.
///
/// # Errors
///
/// Returns an error if the table cannot be written.
pub fn write_catalog_table(
    mut out: impl io::Write,
    lessons: &[&LessonRecord],
    cart: &Cart,
) -> Result<(), RenderError> {
    let mut builder = Builder::default();
    let mut sold_out = Vec::new();

    builder.push_record(["", "Lesson", "Subject", "Location", "Price", "Spaces", "In Cart"]);

    for (idx, lesson) in lessons.iter().enumerate() {
        let reserved = cart.reserved(&lesson.id);

        if lesson.spaces == 0 {
            sold_out.push(idx + 1);
        }

        builder.push_record([
            format!("#{}", idx + 1),
            lesson.id.to_string(),
            lesson.subject.clone(),
            lesson.location.clone(),
            lesson.price.to_string(),
            lesson.spaces.to_string(),
            if reserved > 0 {
                reserved.to_string()
            } else {
                String::new()
            },
        ]);
    }

    let mut table = builder.build();

    table.with(theme());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(4..7), Alignment::right());

    for row in sold_out {
        table.modify(Rows::new(row..=row), color_dark_grey());
    }

    writeln!(out, "\n{table}").map_err(|_err| RenderError::IO)
}

/// Writes the cart lines followed by the item count and total.
///
/// # Errors
///
/// Returns an error if the table cannot be written.
pub fn write_cart_table(
    mut out: impl io::Write,
    cart: &Cart,
    currency: &'static Currency,
) -> Result<(), RenderError> {
    if cart.is_empty() {
        return writeln!(out, "\nYour cart is empty.\n").map_err(|_err| RenderError::IO);
    }

    let mut builder = Builder::default();

    builder.push_record(["Subject", "Location", "Price", "Quantity", "Line Total"]);

    for line in cart.lines() {
        builder.push_record([
            line.subject().to_string(),
            line.location().to_string(),
            line.price().to_string(),
            line.quantity().to_string(),
            Money::from_minor(line.total_minor_units(), currency).to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(theme());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..5), Alignment::right());

    writeln!(out, "\n{table}").map_err(|_err| RenderError::IO)?;

    writeln!(
        out,
        " Items: {}\n \x1b[1mTotal: {}\x1b[0m\n",
        cart.item_count(),
        cart.total_price(currency)
    )
    .map_err(|_err| RenderError::IO)
}

/// Writes a short confirmation for a placed order.
///
/// # Errors
///
/// Returns an error if the summary cannot be written.
pub fn write_order_summary(mut out: impl io::Write, order: &OrderDraft) -> Result<(), RenderError> {
    writeln!(
        out,
        "Order for {} ({}) placed at {}",
        order.customer_name, order.customer_phone, order.placed_at
    )
    .map_err(|_err| RenderError::IO)?;

    for line in &order.lines {
        writeln!(out, "  {} x {} ({})", line.quantity, line.subject, line.lesson)
            .map_err(|_err| RenderError::IO)?;
    }

    writeln!(out, "Total: {}", order.total_price).map_err(|_err| RenderError::IO)
}

fn theme() -> Theme {
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    theme
}

/// ANSI dark grey foreground.
fn color_dark_grey() -> Color {
    Color::new("\x1b[90m", "\x1b[0m")
}
