//! Seatcart prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLine, LineChange, Reconciliation},
    catalog::{Catalog, CatalogError},
    config::Config,
    fixtures::{Fixture, FixtureError},
    forms::{CheckoutForm, Field, LoginForm, SignupForm, ValidationError},
    gateway::{
        AuthOutcome, Backend, CredentialsError, GatewayError, HttpBackend, HttpBackendConfig,
        MemoryBackend, SearchDebouncer, submit_login, submit_signup,
    },
    lessons::{LessonId, LessonRecord},
    notices::{Notice, NoticeKind},
    orders::{OrderDraft, OrderLine, SpaceUpdate},
    selection::Selections,
    storefront::{CheckoutError, CheckoutState, Storefront, StorefrontOptions},
    views::{
        CartTotals, SortField, SortOrder, can_view_cart, cart_totals, checkout_form_valid,
        filter_catalog, sorted_catalog,
    },
};
