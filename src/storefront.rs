//! Storefront
//!
//! Owns the catalog, selections, cart and checkout state for one user session, and drives them
//! from user actions and backend responses. Every catalog reload is followed by a reconciliation
//! pass against the cart before anything else can read the new seat counts.

use std::{sync::Arc, time::Duration};

use jiff::Timestamp;
use rusty_money::iso::{Currency, GBP};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    cart::{Cart, CartError, LineChange, Reconciliation},
    catalog::Catalog,
    forms::{CheckoutForm, ValidationError},
    gateway::{Backend, GatewayError, SearchDebouncer, debounce::DEFAULT_SEARCH_DEBOUNCE},
    lessons::{LessonId, LessonRecord},
    notices::{Notice, Notices},
    orders::OrderDraft,
    selection::Selections,
    views::{CartTotals, SortField, SortOrder, cart_totals, can_view_cart, sorted_catalog},
};

/// Errors from the checkout flow.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The checkout form failed validation; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The cart has no lines to order.
    #[error("Cart is empty")]
    EmptyCart,

    /// An order from this cart has already been submitted.
    #[error("Order already submitted")]
    AlreadySubmitted,

    /// The order could not be saved. Nothing changed.
    #[error("Failed to save order: {0}")]
    Order(#[source] GatewayError),

    /// The order was saved but the seat counts were not updated. The cart is kept.
    #[error("Order saved but lesson spaces were not updated: {0}")]
    PartialCheckout(#[source] GatewayError),

    /// Shopping can only resume after a confirmed order.
    #[error("No confirmed order")]
    NotConfirmed,

    /// There is no seat update waiting to be retried.
    #[error("No pending seat update")]
    NoPendingSeatUpdate,
}

/// Where the session is in the checkout flow.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CheckoutState {
    /// Browsing and editing the cart
    #[default]
    Shopping,

    /// The order was saved but its seat decrements were not
    SeatsPending {
        /// The saved order
        order: OrderDraft,
    },

    /// The order and its seat decrements were both saved
    Confirmed {
        /// The saved order
        order: OrderDraft,
    },
}

/// Storefront settings.
#[derive(Debug, Clone, Copy)]
pub struct StorefrontOptions {
    /// Currency prices and totals are expressed in
    pub currency: &'static Currency,

    /// How long a search waits for typing to pause
    pub search_debounce: Duration,
}

impl Default for StorefrontOptions {
    fn default() -> Self {
        Self {
            currency: GBP,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }
}

/// A single booking session against a backend.
#[derive(Debug)]
pub struct Storefront {
    backend: Arc<dyn Backend>,
    currency: &'static Currency,
    catalog: Catalog,
    selections: Selections,
    cart: Cart,
    form: CheckoutForm,
    notices: Notices,
    search: SearchDebouncer,
    checkout: CheckoutState,
    busy: bool,
}

impl Storefront {
    /// Create an empty session. Call [`Storefront::refresh`] to load the catalog.
    pub fn new(backend: Arc<dyn Backend>, options: StorefrontOptions) -> Self {
        Self {
            backend,
            currency: options.currency,
            catalog: Catalog::new(),
            selections: Selections::new(),
            cart: Cart::with_currency(options.currency),
            form: CheckoutForm::default(),
            notices: Notices::default(),
            search: SearchDebouncer::new(options.search_debounce),
            checkout: CheckoutState::Shopping,
            busy: false,
        }
    }

    /// Current catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Current cart
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Current selections
    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    /// Checkout form as last submitted
    pub fn checkout_form(&self) -> &CheckoutForm {
        &self.form
    }

    /// Checkout state
    pub fn checkout_state(&self) -> &CheckoutState {
        &self.checkout
    }

    /// Currency totals are expressed in
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Whether a backend request or a debounced search is outstanding.
    pub fn is_busy(&self) -> bool {
        self.busy || self.search.has_pending()
    }

    /// Take every pending notice, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Reload the full catalog.
    ///
    /// A search still pending is cancelled so its older, filtered result cannot replace the
    /// fresh catalog. On failure the current catalog is kept and an error notice is queued.
    ///
    /// # Errors
    ///
    /// Returns the backend error when the catalog could not be fetched.
    pub async fn refresh(&mut self) -> Result<Reconciliation, GatewayError> {
        self.search.cancel();
        self.busy = true;

        let fetched = self.backend.fetch_lessons().await;

        self.busy = false;

        match fetched {
            Ok(lessons) => Ok(self.apply_catalog(lessons)),
            Err(err) => {
                self.fetch_failed(&err);

                Err(err)
            }
        }
    }

    /// Replace the catalog with fresh records and re-apply the cart's reservations.
    ///
    /// Once an order is confirmed the backend has already taken its seats, so the cart is not
    /// subtracted a second time.
    pub fn apply_catalog(&mut self, lessons: impl IntoIterator<Item = LessonRecord>) -> Reconciliation {
        self.catalog.replace_all(lessons);

        if matches!(self.checkout, CheckoutState::Confirmed { .. }) {
            debug!("order confirmed, skipping reconciliation");

            return Reconciliation::default();
        }

        let outcome = self.cart.reconcile(&mut self.catalog);

        if !outcome.clamped.is_empty() {
            warn!(
                lessons = ?outcome.clamped,
                "fresh seat counts below local reservations"
            );
        }

        info!(
            lessons = self.catalog.len(),
            reserved = outcome.applied,
            "catalog reloaded"
        );

        outcome
    }

    /// Schedule a search, superseding any search still pending. A blank query reloads the full
    /// catalog.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule_search(&mut self, query: impl Into<String>) -> u64 {
        self.search.schedule(Arc::clone(&self.backend), query)
    }

    /// Cancel the pending search, if any.
    pub fn cancel_search(&mut self) {
        self.search.cancel();
    }

    /// Wait for the most recently scheduled search and apply its results.
    ///
    /// Returns `None` when no search is pending. On failure the current catalog is kept and an
    /// error notice is queued.
    pub async fn wait_for_search(&mut self) -> Option<Result<Reconciliation, GatewayError>> {
        let completion = self.search.next_completion().await?;

        match completion.result {
            Ok(lessons) => Some(Ok(self.apply_catalog(lessons))),
            Err(err) => {
                if completion.query.trim().is_empty() {
                    self.fetch_failed(&err);
                } else {
                    match err.rejection_message() {
                        Some(message) => self.notices.error(format!("Search failed: {message}")),
                        None => self.notices.error("Server error while searching"),
                    }
                }

                Some(Err(err))
            }
        }
    }

    fn fetch_failed(&mut self, err: &GatewayError) {
        warn!(error = %err, "failed to fetch lessons");

        match err {
            GatewayError::Rejected { .. } => self.notices.error("Error fetching lessons"),
            GatewayError::Http(_) | GatewayError::UnexpectedResponse(_) => {
                self.notices.error("Server connection failed");
            }
        }
    }

    /// Stage one more seat for a lesson. Returns the staged quantity.
    pub fn stage_increase(&mut self, lesson: &LessonId) -> u32 {
        self.selections.increase(&self.catalog, lesson)
    }

    /// Unstage one seat for a lesson. Returns the staged quantity.
    pub fn stage_decrease(&mut self, lesson: &LessonId) -> u32 {
        self.selections.decrease(lesson)
    }

    /// Staged quantity for a lesson
    pub fn staged(&self, lesson: &LessonId) -> u32 {
        self.selections.get_staged(lesson)
    }

    fn ensure_shopping(&mut self) -> Result<(), CartError> {
        if matches!(self.checkout, CheckoutState::Shopping) {
            return Ok(());
        }

        self.notices.error("Order already submitted");

        Err(CartError::CheckoutPending)
    }

    fn refuse(&mut self, err: CartError) -> CartError {
        self.notices.error(err.to_string());

        err
    }

    fn subject_of(&self, lesson: &LessonId) -> String {
        self.cart
            .line(lesson)
            .map(|line| line.subject().to_string())
            .or_else(|| {
                self.catalog
                    .find_by_id(lesson)
                    .map(|record| record.subject.clone())
            })
            .unwrap_or_else(|| lesson.to_string())
    }

    /// Commit a lesson's staged seats to the cart. Returns the quantity added.
    ///
    /// # Errors
    ///
    /// Returns the [`CartError`] from [`Cart::commit`], or [`CartError::CheckoutPending`] once
    /// an order has been submitted. A refusal also queues an error notice.
    pub fn add_to_cart(&mut self, lesson: &LessonId) -> Result<u32, CartError> {
        self.ensure_shopping()?;

        match self
            .cart
            .commit(&mut self.catalog, &mut self.selections, lesson)
        {
            Ok(quantity) => {
                let subject = self.subject_of(lesson);

                self.notices
                    .success(format!("Added {quantity} {subject} to cart"));

                Ok(quantity)
            }
            Err(err) => Err(self.refuse(err)),
        }
    }

    /// Reserve one more seat on a cart line. Returns the new quantity.
    ///
    /// # Errors
    ///
    /// Returns the [`CartError`] from [`Cart::increase_line`], or
    /// [`CartError::CheckoutPending`] once an order has been submitted.
    pub fn increase_cart_quantity(&mut self, lesson: &LessonId) -> Result<u32, CartError> {
        self.ensure_shopping()?;

        match self.cart.increase_line(&mut self.catalog, lesson) {
            Ok(quantity) => {
                let subject = self.subject_of(lesson);

                self.notices
                    .success(format!("Increased quantity for {subject}"));

                Ok(quantity)
            }
            Err(err) => Err(self.refuse(err)),
        }
    }

    /// Release one seat from a cart line, removing the line at quantity one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if the lesson is not in the cart, or
    /// [`CartError::CheckoutPending`] once an order has been submitted.
    pub fn decrease_cart_quantity(&mut self, lesson: &LessonId) -> Result<LineChange, CartError> {
        self.ensure_shopping()?;

        match self.cart.decrease_line(&mut self.catalog, lesson) {
            Ok(LineChange::Decreased(quantity)) => {
                let subject = self.subject_of(lesson);

                self.notices
                    .success(format!("Decreased quantity for {subject}"));

                Ok(LineChange::Decreased(quantity))
            }
            Ok(LineChange::Removed(line)) => {
                self.notices
                    .success(format!("{} removed from cart", line.subject()));

                Ok(LineChange::Removed(line))
            }
            Err(err) => Err(self.refuse(err)),
        }
    }

    /// Remove a cart line and return its seats to the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if the lesson is not in the cart, or
    /// [`CartError::CheckoutPending`] once an order has been submitted.
    pub fn remove_from_cart(&mut self, lesson: &LessonId) -> Result<(), CartError> {
        self.ensure_shopping()?;

        match self.cart.remove_line(&mut self.catalog, lesson) {
            Ok(line) => {
                self.notices
                    .success(format!("{} removed from cart", line.subject()));

                Ok(())
            }
            Err(err) => Err(self.refuse(err)),
        }
    }

    /// Whether the cart page can be opened; queues a notice when it cannot.
    pub fn show_cart(&mut self) -> bool {
        let allowed = can_view_cart(&self.cart);

        if !allowed {
            self.notices.error("Your cart is empty. Add a lesson first");
        }

        allowed
    }

    /// Cart totals in the session currency
    pub fn totals(&self) -> CartTotals {
        cart_totals(&self.cart, self.currency)
    }

    /// Catalog ordered by `field`
    pub fn sorted(&self, field: SortField, order: SortOrder) -> Vec<&LessonRecord> {
        sorted_catalog(&self.catalog, field, order)
    }

    /// Submit the cart as an order, then persist its seat decrements.
    ///
    /// The two steps are not transactional. When the order is saved but the seat update fails,
    /// the cart is kept, the session moves to [`CheckoutState::SeatsPending`] and the update can
    /// be retried with [`Storefront::retry_space_updates`].
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::AlreadySubmitted`]: an order from this cart was already saved.
    /// - [`CheckoutError::Validation`]: the form is invalid.
    /// - [`CheckoutError::EmptyCart`]: there is nothing to order.
    /// - [`CheckoutError::Order`]: the order was not saved; nothing changed.
    /// - [`CheckoutError::PartialCheckout`]: the order was saved but the seats were not.
    pub async fn checkout(&mut self, form: CheckoutForm) -> Result<OrderDraft, CheckoutError> {
        if !matches!(self.checkout, CheckoutState::Shopping) {
            self.notices.error("Order already submitted");

            return Err(CheckoutError::AlreadySubmitted);
        }

        self.form = form;

        if let Err(err) = self.form.validate() {
            self.notices.error("Please fill out the form correctly");

            return Err(err.into());
        }

        if self.cart.is_empty() {
            self.notices.error("Your cart is empty. Add a lesson first");

            return Err(CheckoutError::EmptyCart);
        }

        let order = OrderDraft::from_cart(&self.form, &self.cart, self.currency, Timestamp::now());

        self.busy = true;

        let submitted = self.backend.submit_order(&order).await;

        if let Err(err) = submitted {
            self.busy = false;

            warn!(error = %err, "failed to save order");

            match err.rejection_message() {
                Some(message) => self.notices.error(format!("Failed to save order: {message}")),
                None => self.notices.error("Error while processing checkout"),
            }

            return Err(CheckoutError::Order(err));
        }

        info!(
            lines = order.lines.len(),
            total = %order.total_price,
            "order saved"
        );

        let persisted = self.backend.update_spaces(&order.space_updates()).await;

        self.busy = false;

        match persisted {
            Ok(()) => {
                info!("lesson spaces updated");

                self.checkout = CheckoutState::Confirmed {
                    order: order.clone(),
                };

                Ok(order)
            }
            Err(err) => {
                self.seat_update_failed(&err);

                self.checkout = CheckoutState::SeatsPending { order };

                Err(CheckoutError::PartialCheckout(err))
            }
        }
    }

    fn seat_update_failed(&mut self, err: &GatewayError) {
        warn!(error = %err, "failed to update lesson spaces");

        match err.rejection_message() {
            Some(message) => self
                .notices
                .error(format!("Failed to update lesson spaces: {message}")),
            None => self.notices.error("Error updating lesson spaces"),
        }
    }

    /// Retry the seat update of a saved order.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NoPendingSeatUpdate`] unless the session is in
    /// [`CheckoutState::SeatsPending`], or [`CheckoutError::PartialCheckout`] if the retry fails
    /// too.
    pub async fn retry_space_updates(&mut self) -> Result<(), CheckoutError> {
        let CheckoutState::SeatsPending { order } = &self.checkout else {
            return Err(CheckoutError::NoPendingSeatUpdate);
        };

        let order = order.clone();

        self.busy = true;

        let persisted = self.backend.update_spaces(&order.space_updates()).await;

        self.busy = false;

        match persisted {
            Ok(()) => {
                info!("lesson spaces updated on retry");

                self.checkout = CheckoutState::Confirmed { order };

                Ok(())
            }
            Err(err) => {
                self.seat_update_failed(&err);

                Err(CheckoutError::PartialCheckout(err))
            }
        }
    }

    /// Start over after a confirmed order: clear the cart, selections and form, then reload the
    /// catalog.
    ///
    /// A failed reload keeps the settled local catalog and queues its own notice.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NotConfirmed`] unless the current order is confirmed.
    pub async fn continue_shopping(&mut self) -> Result<(), CheckoutError> {
        if !matches!(self.checkout, CheckoutState::Confirmed { .. }) {
            return Err(CheckoutError::NotConfirmed);
        }

        self.cart.clear();
        self.catalog.settle();
        self.selections.clear_all();
        self.form = CheckoutForm::default();
        self.checkout = CheckoutState::Shopping;

        if let Err(err) = self.refresh().await {
            debug!(error = %err, "reload after checkout failed, keeping local catalog");
        }

        self.notices.success("Order completed successfully");

        Ok(())
    }
}
