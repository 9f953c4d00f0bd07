//! Orders

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};

use crate::{
    cart::{Cart, CartLine},
    forms::CheckoutForm,
    lessons::LessonId,
};

/// A line of an order: how many seats of which lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    /// Lesson id
    pub lesson: LessonId,

    /// Lesson subject
    pub subject: String,

    /// Seats ordered
    pub quantity: u32,
}

impl From<&CartLine> for OrderLine {
    fn from(line: &CartLine) -> Self {
        Self {
            lesson: line.lesson().clone(),
            subject: line.subject().to_string(),
            quantity: line.quantity(),
        }
    }
}

/// Order handed to the backend at checkout. Built once, sent, then dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    /// Customer name, trimmed
    pub customer_name: String,

    /// Customer phone, trimmed
    pub customer_phone: String,

    /// Snapshot of the cart lines
    pub lines: Vec<OrderLine>,

    /// Total price of the order
    pub total_price: Money<'static, Currency>,

    /// When the order was placed
    pub placed_at: Timestamp,
}

impl OrderDraft {
    /// Snapshot a cart into an order draft.
    pub fn from_cart(
        form: &CheckoutForm,
        cart: &Cart,
        currency: &'static Currency,
        placed_at: Timestamp,
    ) -> Self {
        Self {
            customer_name: form.name.trim().to_string(),
            customer_phone: form.phone.trim().to_string(),
            lines: cart.lines().map(OrderLine::from).collect(),
            total_price: cart.total_price(currency),
            placed_at,
        }
    }

    /// Seat decrements to persist once the order has been accepted.
    pub fn space_updates(&self) -> Vec<SpaceUpdate> {
        self.lines
            .iter()
            .map(|line| SpaceUpdate {
                lesson: line.lesson.clone(),
                change: -i64::from(line.quantity),
            })
            .collect()
    }
}

/// A signed change to a lesson's seat count on the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceUpdate {
    /// Lesson id
    pub lesson: LessonId,

    /// Seats to add (negative to take seats)
    pub change: i64,
}
