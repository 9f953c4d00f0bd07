//! Cart
//!
//! Committed reservations. Every quantity change on a line is mirrored by an equal and opposite
//! change to the lesson's available spaces in the [`Catalog`], so that for each lesson
//! `spaces + reserved == capacity` holds after every operation.
//!
//! A reload can report fewer spaces than a line already holds. The seats it could not cover are
//! kept as the line's shortfall and are released first, so the catalog never gets back seats it
//! did not give.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::Catalog,
    lessons::{LessonId, LessonRecord},
    selection::Selections,
};

/// Errors raised by cart operations. A failed operation leaves the cart and catalog untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Nothing is staged for the lesson.
    #[error("No seats selected for lesson {0}")]
    NothingStaged(LessonId),

    /// The lesson does not have enough seats left.
    #[error("Lesson {lesson} has {available} seats left, {requested} requested")]
    InsufficientSpace {
        /// Lesson id
        lesson: LessonId,
        /// Seats requested
        requested: u32,
        /// Seats available
        available: u32,
    },

    /// The lesson is not in the current catalog.
    #[error("Lesson {0} not found")]
    LessonNotFound(LessonId),

    /// The cart has no line for the lesson.
    #[error("Lesson {0} is not in the cart")]
    LineNotFound(LessonId),

    /// The cart belongs to a submitted order and cannot change until shopping resumes.
    #[error("Cart is locked by a submitted order")]
    CheckoutPending,

    /// The lesson is priced in a different currency from the cart.
    #[error("Lesson {lesson} is priced in {found}, the cart is in {expected}")]
    CurrencyMismatch {
        /// Lesson id
        lesson: LessonId,
        /// Cart currency code
        expected: &'static str,
        /// Lesson currency code
        found: &'static str,
    },
}

/// A committed cart line. Quantity is always at least one.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    lesson: LessonId,
    subject: String,
    location: String,
    price: Money<'static, Currency>,
    quantity: u32,
    unbacked: u32,
}

impl CartLine {
    fn from_lesson(lesson: &LessonRecord, quantity: u32) -> Self {
        Self {
            lesson: lesson.id.clone(),
            subject: lesson.subject.clone(),
            location: lesson.location.clone(),
            price: lesson.price,
            quantity,
            unbacked: 0,
        }
    }

    /// Release `quantity` seats from the line, returning how many the catalog should get back.
    ///
    /// Seats the last reload could not cover are released first and return nothing.
    fn release(&mut self, quantity: u32) -> u32 {
        let uncovered = quantity.min(self.unbacked);

        self.unbacked -= uncovered;
        self.quantity = self.quantity.saturating_sub(quantity);

        quantity - uncovered
    }

    /// Returns the lesson id
    pub fn lesson(&self) -> &LessonId {
        &self.lesson
    }

    /// Returns the subject, as it was when the line was created
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the location, as it was when the line was created
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Returns the seat price snapshot taken when the line was created
    pub fn price(&self) -> &Money<'static, Currency> {
        &self.price
    }

    /// Returns the number of seats reserved
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns how many of the reserved seats the last reload had no spaces left for
    pub fn shortfall(&self) -> u32 {
        self.unbacked
    }

    /// Returns the reserved seats that were subtracted from the catalog
    pub fn backed_quantity(&self) -> u32 {
        self.quantity - self.unbacked
    }

    /// Returns `price × quantity` in minor units
    pub fn total_minor_units(&self) -> i64 {
        self.price
            .to_minor_units()
            .saturating_mul(i64::from(self.quantity))
    }
}

/// Result of decreasing a line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineChange {
    /// The line still exists with the given quantity.
    Decreased(u32),

    /// The line held a single seat and was removed.
    Removed(CartLine),
}

/// Outcome of re-applying outstanding reservations to a freshly loaded catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Lines whose reservations were re-applied.
    pub applied: usize,

    /// Lines whose lesson is absent from the new catalog.
    pub missing: Vec<LessonId>,

    /// Lessons whose fresh seat count was smaller than the local reservation.
    pub clamped: Vec<LessonId>,
}

/// Cart Ledger
#[derive(Debug, Default, Clone)]
pub struct Cart {
    lines: Vec<CartLine>,
    currency: Option<&'static Currency>,
}

impl Cart {
    /// Create an empty cart that takes its currency from the first committed lesson.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cart that only accepts lessons priced in `currency`.
    pub fn with_currency(currency: &'static Currency) -> Self {
        Self {
            lines: Vec::new(),
            currency: Some(currency),
        }
    }

    /// Currency every line is priced in, if known yet.
    pub fn currency(&self) -> Option<&'static Currency> {
        self.currency
            .or_else(|| self.lines.first().map(|line| line.price.currency()))
    }

    /// Move a lesson's staged quantity into the cart.
    ///
    /// Merges into an existing line for the same lesson, otherwise creates one with a snapshot
    /// of the lesson's subject, location and price. Returns the quantity committed.
    ///
    /// # Errors
    ///
    /// - [`CartError::NothingStaged`]: the staged quantity is zero.
    /// - [`CartError::LessonNotFound`]: the lesson is not in the catalog.
    /// - [`CartError::InsufficientSpace`]: the staged quantity exceeds the available spaces.
    /// - [`CartError::CurrencyMismatch`]: the lesson is priced in another currency than the cart.
    pub fn commit(
        &mut self,
        catalog: &mut Catalog,
        selections: &mut Selections,
        lesson: &LessonId,
    ) -> Result<u32, CartError> {
        let quantity = selections.get_staged(lesson);

        if quantity == 0 {
            return Err(CartError::NothingStaged(lesson.clone()));
        }

        let record = catalog
            .find_by_id(lesson)
            .ok_or_else(|| CartError::LessonNotFound(lesson.clone()))?;

        if let Some(expected) = self.currency()
            && expected != record.price.currency()
        {
            return Err(CartError::CurrencyMismatch {
                lesson: lesson.clone(),
                expected: expected.iso_alpha_code,
                found: record.price.currency().iso_alpha_code,
            });
        }

        if quantity > record.spaces {
            return Err(CartError::InsufficientSpace {
                lesson: lesson.clone(),
                requested: quantity,
                available: record.spaces,
            });
        }

        match self.lines.iter_mut().find(|line| &line.lesson == lesson) {
            Some(line) => line.quantity += quantity,
            None => self.lines.push(CartLine::from_lesson(record, quantity)),
        }

        catalog
            .adjust_spaces(lesson, -i64::from(quantity))
            .map_err(|_err| CartError::LessonNotFound(lesson.clone()))?;

        selections.clear(lesson);

        debug!(lesson = %lesson, quantity, "committed seats to cart");

        Ok(quantity)
    }

    /// Reserve one more seat on an existing line. Returns the new quantity.
    ///
    /// # Errors
    ///
    /// - [`CartError::LineNotFound`]: the lesson is not in the cart.
    /// - [`CartError::LessonNotFound`]: the lesson is not in the current catalog.
    /// - [`CartError::InsufficientSpace`]: the lesson has no seats left.
    pub fn increase_line(
        &mut self,
        catalog: &mut Catalog,
        lesson: &LessonId,
    ) -> Result<u32, CartError> {
        let line = self
            .lines
            .iter_mut()
            .find(|line| &line.lesson == lesson)
            .ok_or_else(|| CartError::LineNotFound(lesson.clone()))?;

        let available = catalog
            .find_by_id(lesson)
            .ok_or_else(|| CartError::LessonNotFound(lesson.clone()))?
            .spaces;

        if available == 0 {
            return Err(CartError::InsufficientSpace {
                lesson: lesson.clone(),
                requested: 1,
                available,
            });
        }

        line.quantity += 1;

        catalog
            .adjust_spaces(lesson, -1)
            .map_err(|_err| CartError::LessonNotFound(lesson.clone()))?;

        Ok(line.quantity)
    }

    /// Release one seat from a line. A line holding a single seat is removed instead.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if the lesson is not in the cart.
    pub fn decrease_line(
        &mut self,
        catalog: &mut Catalog,
        lesson: &LessonId,
    ) -> Result<LineChange, CartError> {
        let line = self
            .lines
            .iter_mut()
            .find(|line| &line.lesson == lesson)
            .ok_or_else(|| CartError::LineNotFound(lesson.clone()))?;

        if line.quantity <= 1 {
            return self.remove_line(catalog, lesson).map(LineChange::Removed);
        }

        let restored = line.release(1);
        let quantity = line.quantity;

        restore_spaces(catalog, lesson, restored);

        Ok(LineChange::Decreased(quantity))
    }

    /// Delete a line and return its seats to the catalog.
    ///
    /// Only seats that were actually subtracted from the catalog come back, so a lesson never
    /// ends up with more spaces than the last reload reported.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if the lesson is not in the cart.
    pub fn remove_line(
        &mut self,
        catalog: &mut Catalog,
        lesson: &LessonId,
    ) -> Result<CartLine, CartError> {
        let position = self
            .lines
            .iter()
            .position(|line| &line.lesson == lesson)
            .ok_or_else(|| CartError::LineNotFound(lesson.clone()))?;

        let removed = self.lines.remove(position);

        restore_spaces(catalog, lesson, removed.backed_quantity());

        Ok(removed)
    }

    /// Re-subtract every outstanding reservation from a freshly replaced catalog.
    ///
    /// Must run after each [`Catalog::replace_all`] and before the catalog is read by anything
    /// else; the fresh seat counts do not know about this cart. Lines whose lesson is missing
    /// from the new catalog are left in the cart untouched.
    ///
    /// When a lesson has fewer fresh spaces than the line holds, the difference is recorded as
    /// the line's shortfall and is not handed back when the line is released.
    pub fn reconcile(&mut self, catalog: &mut Catalog) -> Reconciliation {
        let mut outcome = Reconciliation::default();

        for line in &mut self.lines {
            let fresh = match catalog.find_by_id(&line.lesson) {
                Some(record) => record.spaces,
                None => {
                    outcome.missing.push(line.lesson.clone());
                    continue;
                }
            };

            line.unbacked = line.quantity.saturating_sub(fresh);

            if line.unbacked > 0 {
                outcome.clamped.push(line.lesson.clone());
            }

            if catalog
                .adjust_spaces(&line.lesson, -i64::from(line.quantity))
                .is_ok()
            {
                outcome.applied += 1;
            }
        }

        debug!(
            applied = outcome.applied,
            missing = outcome.missing.len(),
            clamped = outcome.clamped.len(),
            "reconciled cart against catalog"
        );

        outcome
    }

    /// Get the line for a lesson.
    pub fn line(&self, lesson: &LessonId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.lesson == lesson)
    }

    /// Seats this cart holds for a lesson.
    pub fn reserved(&self, lesson: &LessonId) -> u32 {
        self.line(lesson).map_or(0, CartLine::quantity)
    }

    /// Iterate over the lines in the order they were added.
    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }

    /// Sum of `price × quantity` over all lines, in the cart's currency.
    ///
    /// `fallback` is only used for an empty cart with no currency of its own.
    pub fn total_price(&self, fallback: &'static Currency) -> Money<'static, Currency> {
        let total = self
            .lines
            .iter()
            .fold(0_i64, |acc, line| acc.saturating_add(line.total_minor_units()));

        Money::from_minor(total, self.currency().unwrap_or(fallback))
    }

    /// Sum of quantities over all lines.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(CartLine::quantity).sum()
    }

    /// Get the number of lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Drop every line without touching the catalog. Only valid once the order is persisted.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

fn restore_spaces(catalog: &mut Catalog, lesson: &LessonId, quantity: u32) {
    if catalog
        .adjust_spaces(lesson, i64::from(quantity))
        .is_err()
    {
        debug!(lesson = %lesson, quantity, "lesson not in catalog, seats restored on next reload");
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{EUR, GBP};
    use testresult::TestResult;

    use super::*;

    fn math() -> LessonId {
        LessonId::from("m1")
    }

    fn setup(spaces: u32) -> (Catalog, Selections, Cart) {
        let catalog = Catalog::with_lessons([
            LessonRecord::new("m1", "Math", "London", Money::from_minor(2000, GBP), spaces),
            LessonRecord::new("a1", "Art", "Leeds", Money::from_minor(1500, GBP), 10),
        ]);

        (catalog, Selections::new(), Cart::new())
    }

    fn stage(catalog: &Catalog, selections: &mut Selections, lesson: &LessonId, n: u32) {
        for _ in 0..n {
            selections.increase(catalog, lesson);
        }
    }

    fn assert_invariant(catalog: &Catalog, cart: &Cart) {
        for lesson in catalog.records() {
            assert_eq!(
                lesson.spaces + cart.reserved(&lesson.id),
                lesson.capacity,
                "seat invariant broken for {}",
                lesson.id
            );
        }
    }

    #[test]
    fn commit_creates_line_and_takes_seats() -> TestResult {
        let (mut catalog, mut selections, mut cart) = setup(5);
        stage(&catalog, &mut selections, &math(), 3);

        let committed = cart.commit(&mut catalog, &mut selections, &math())?;

        assert_eq!(committed, 3);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.reserved(&math()), 3);
        assert_eq!(catalog.spaces(&math()), 2);
        assert_eq!(selections.get_staged(&math()), 0);
        assert_invariant(&catalog, &cart);

        Ok(())
    }

    #[test]
    fn commit_merges_into_existing_line() -> TestResult {
        let (mut catalog, mut selections, mut cart) = setup(5);

        stage(&catalog, &mut selections, &math(), 2);
        cart.commit(&mut catalog, &mut selections, &math())?;
        stage(&catalog, &mut selections, &math(), 1);
        cart.commit(&mut catalog, &mut selections, &math())?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.reserved(&math()), 3);
        assert_invariant(&catalog, &cart);

        Ok(())
    }

    #[test]
    fn commit_nothing_staged_errors() {
        let (mut catalog, mut selections, mut cart) = setup(5);

        let result = cart.commit(&mut catalog, &mut selections, &math());

        assert_eq!(result, Err(CartError::NothingStaged(math())));
        assert!(cart.is_empty());
        assert_eq!(catalog.spaces(&math()), 5);
    }

    #[test]
    fn commit_more_than_available_errors_without_partial_commit() -> TestResult {
        let (mut catalog, mut selections, mut cart) = setup(3);
        stage(&catalog, &mut selections, &math(), 3);

        // Another path takes two seats after staging.
        catalog.adjust_spaces(&math(), -2)?;

        let result = cart.commit(&mut catalog, &mut selections, &math());

        assert_eq!(
            result,
            Err(CartError::InsufficientSpace {
                lesson: math(),
                requested: 3,
                available: 1,
            })
        );
        assert!(cart.is_empty());
        assert_eq!(catalog.spaces(&math()), 1);
        assert_eq!(selections.get_staged(&math()), 3);

        Ok(())
    }

    #[test]
    fn commit_snapshots_price() -> TestResult {
        let (mut catalog, mut selections, mut cart) = setup(5);
        stage(&catalog, &mut selections, &math(), 1);
        cart.commit(&mut catalog, &mut selections, &math())?;

        catalog.replace_all([LessonRecord::new(
            "m1",
            "Math",
            "London",
            Money::from_minor(9999, GBP),
            5,
        )]);

        assert_eq!(
            cart.line(&math()).map(CartLine::price),
            Some(&Money::from_minor(2000, GBP))
        );

        Ok(())
    }

    #[test]
    fn increase_line_until_sold_out() -> TestResult {
        let (mut catalog, mut selections, mut cart) = setup(5);
        stage(&catalog, &mut selections, &math(), 3);
        cart.commit(&mut catalog, &mut selections, &math())?;

        assert_eq!(cart.increase_line(&mut catalog, &math())?, 4);
        assert_eq!(cart.increase_line(&mut catalog, &math())?, 5);
        assert_eq!(catalog.spaces(&math()), 0);

        let result = cart.increase_line(&mut catalog, &math());

        assert!(matches!(
            result,
            Err(CartError::InsufficientSpace { available: 0, .. })
        ));
        assert_eq!(cart.reserved(&math()), 5);
        assert_invariant(&catalog, &cart);

        Ok(())
    }

    #[test]
    fn increase_line_missing_line_errors() {
        let (mut catalog, _, mut cart) = setup(5);

        assert_eq!(
            cart.increase_line(&mut catalog, &math()),
            Err(CartError::LineNotFound(math()))
        );
    }

    #[test]
    fn decrease_line_restores_one_seat() -> TestResult {
        let (mut catalog, mut selections, mut cart) = setup(5);
        stage(&catalog, &mut selections, &math(), 2);
        cart.commit(&mut catalog, &mut selections, &math())?;

        let change = cart.decrease_line(&mut catalog, &math())?;

        assert_eq!(change, LineChange::Decreased(1));
        assert_eq!(catalog.spaces(&math()), 4);
        assert_invariant(&catalog, &cart);

        Ok(())
    }

    #[test]
    fn decrease_line_at_one_removes_line() -> TestResult {
        let (mut catalog, mut selections, mut cart) = setup(5);
        stage(&catalog, &mut selections, &math(), 1);
        cart.commit(&mut catalog, &mut selections, &math())?;

        let before = catalog.spaces(&math());
        let change = cart.decrease_line(&mut catalog, &math())?;

        assert!(matches!(change, LineChange::Removed(ref line) if line.quantity() == 1));
        assert!(cart.line(&math()).is_none());
        assert_eq!(catalog.spaces(&math()), before + 1);
        assert_invariant(&catalog, &cart);

        Ok(())
    }

    #[test]
    fn remove_then_recommit_restores_seat_count() -> TestResult {
        let (mut catalog, mut selections, mut cart) = setup(5);
        stage(&catalog, &mut selections, &math(), 3);
        cart.commit(&mut catalog, &mut selections, &math())?;

        let removed = cart.remove_line(&mut catalog, &math())?;

        assert_eq!(removed.quantity(), 3);
        assert_eq!(catalog.spaces(&math()), 5);

        stage(&catalog, &mut selections, &math(), 3);
        cart.commit(&mut catalog, &mut selections, &math())?;

        assert_eq!(catalog.spaces(&math()), 2);
        assert_invariant(&catalog, &cart);

        Ok(())
    }

    #[test]
    fn remove_line_for_lesson_missing_from_catalog_still_removes() -> TestResult {
        let (mut catalog, mut selections, mut cart) = setup(5);
        stage(&catalog, &mut selections, &math(), 2);
        cart.commit(&mut catalog, &mut selections, &math())?;

        catalog.replace_all([LessonRecord::new(
            "a1",
            "Art",
            "Leeds",
            Money::from_minor(1500, GBP),
            10,
        )]);

        let removed = cart.remove_line(&mut catalog, &math())?;

        assert_eq!(removed.quantity(), 2);
        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn reconcile_reapplies_reservations() -> TestResult {
        let (mut catalog, mut selections, mut cart) = setup(10);
        stage(&catalog, &mut selections, &math(), 4);
        cart.commit(&mut catalog, &mut selections, &math())?;

        catalog.replace_all([LessonRecord::new(
            "m1",
            "Math",
            "London",
            Money::from_minor(2000, GBP),
            10,
        )]);

        let outcome = cart.reconcile(&mut catalog);

        assert_eq!(outcome.applied, 1);
        assert_eq!(catalog.spaces(&math()), 6);
        assert_invariant(&catalog, &cart);

        Ok(())
    }

    #[test]
    fn reconcile_reports_missing_and_clamped_lessons() -> TestResult {
        let (mut catalog, mut selections, mut cart) = setup(10);
        let art = LessonId::from("a1");

        stage(&catalog, &mut selections, &math(), 4);
        cart.commit(&mut catalog, &mut selections, &math())?;
        stage(&catalog, &mut selections, &art, 2);
        cart.commit(&mut catalog, &mut selections, &art)?;

        catalog.replace_all([LessonRecord::new(
            "m1",
            "Math",
            "London",
            Money::from_minor(2000, GBP),
            3,
        )]);

        let outcome = cart.reconcile(&mut catalog);

        assert_eq!(outcome.missing, vec![art.clone()]);
        assert_eq!(outcome.clamped, vec![math()]);
        assert_eq!(catalog.spaces(&math()), 0);
        assert_eq!(cart.reserved(&art), 2);
        assert_eq!(cart.line(&math()).map(CartLine::shortfall), Some(1));

        Ok(())
    }

    #[test]
    fn releasing_a_clamped_line_returns_only_backed_seats() -> TestResult {
        let (mut catalog, mut selections, mut cart) = setup(10);

        stage(&catalog, &mut selections, &math(), 4);
        cart.commit(&mut catalog, &mut selections, &math())?;

        catalog.replace_all([LessonRecord::new(
            "m1",
            "Math",
            "London",
            Money::from_minor(2000, GBP),
            2,
        )]);
        cart.reconcile(&mut catalog);

        // The first two releases cover seats the reload had no room for.
        cart.decrease_line(&mut catalog, &math())?;
        cart.decrease_line(&mut catalog, &math())?;

        assert_eq!(catalog.spaces(&math()), 0);
        assert_eq!(cart.line(&math()).map(CartLine::shortfall), Some(0));

        cart.decrease_line(&mut catalog, &math())?;

        assert_eq!(catalog.spaces(&math()), 1);
        assert_invariant(&catalog, &cart);

        cart.remove_line(&mut catalog, &math())?;

        assert_eq!(catalog.spaces(&math()), 2);
        assert_invariant(&catalog, &cart);

        Ok(())
    }

    #[test]
    fn commit_rejects_lesson_in_another_currency() -> TestResult {
        let mut catalog = Catalog::with_lessons([
            LessonRecord::new("m1", "Math", "London", Money::from_minor(2000, GBP), 5),
            LessonRecord::new("p1", "Piano", "Paris", Money::from_minor(2500, EUR), 5),
        ]);
        let mut selections = Selections::new();
        let mut cart = Cart::new();
        let piano = LessonId::from("p1");

        stage(&catalog, &mut selections, &math(), 1);
        cart.commit(&mut catalog, &mut selections, &math())?;
        stage(&catalog, &mut selections, &piano, 1);

        let result = cart.commit(&mut catalog, &mut selections, &piano);

        assert_eq!(
            result,
            Err(CartError::CurrencyMismatch {
                lesson: piano.clone(),
                expected: "GBP",
                found: "EUR",
            })
        );
        assert_eq!(catalog.spaces(&piano), 5);
        assert_eq!(selections.get_staged(&piano), 1);

        Ok(())
    }

    #[test]
    fn total_uses_the_line_currency() -> TestResult {
        let (mut catalog, mut selections, mut cart) = setup(5);

        stage(&catalog, &mut selections, &math(), 1);
        cart.commit(&mut catalog, &mut selections, &math())?;

        assert_eq!(cart.total_price(EUR), Money::from_minor(2000, GBP));

        Ok(())
    }

    #[test]
    fn cart_with_currency_refuses_other_prices() {
        let mut catalog = Catalog::with_lessons([LessonRecord::new(
            "m1",
            "Math",
            "London",
            Money::from_minor(2000, GBP),
            5,
        )]);
        let mut selections = Selections::new();
        let mut cart = Cart::with_currency(EUR);

        stage(&catalog, &mut selections, &math(), 1);

        assert!(matches!(
            cart.commit(&mut catalog, &mut selections, &math()),
            Err(CartError::CurrencyMismatch { .. })
        ));
        assert!(cart.is_empty());
        assert_eq!(cart.total_price(GBP), Money::from_minor(0, EUR));
    }

    #[test]
    fn totals_sum_price_times_quantity() -> TestResult {
        let (mut catalog, mut selections, mut cart) = setup(5);
        let art = LessonId::from("a1");

        stage(&catalog, &mut selections, &math(), 2);
        cart.commit(&mut catalog, &mut selections, &math())?;
        stage(&catalog, &mut selections, &art, 3);
        cart.commit(&mut catalog, &mut selections, &art)?;

        assert_eq!(cart.total_price(GBP), Money::from_minor(8500, GBP));
        assert_eq!(cart.item_count(), 5);

        Ok(())
    }

    #[test]
    fn empty_cart_totals_zero() {
        let cart = Cart::new();

        assert_eq!(cart.total_price(GBP), Money::from_minor(0, GBP));
        assert_eq!(cart.item_count(), 0);
        assert!(cart.is_empty());
    }
}
