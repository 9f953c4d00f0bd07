//! End-to-end booking against the in-memory backend serving the default fixture set.
//!
//! Walks the whole session: load the catalog, stage and commit seats, adjust the cart, check
//! out, and start shopping again with a catalog that reflects the sold seats.

use std::sync::Arc;

use testresult::TestResult;

use seatcart::{
    cart::{CartError, LineChange},
    fixtures::Fixture,
    forms::CheckoutForm,
    gateway::MemoryBackend,
    lessons::LessonId,
    storefront::{CheckoutError, CheckoutState, Storefront, StorefrontOptions},
    views::{SortField, SortOrder},
};

fn math() -> LessonId {
    LessonId::from("m1")
}

async fn session() -> Result<(Arc<MemoryBackend>, Storefront), Box<dyn std::error::Error>> {
    let fixture = Fixture::from_set("default")?;
    let backend = Arc::new(MemoryBackend::from_fixture(&fixture));
    let mut storefront = Storefront::new(
        backend.clone(),
        StorefrontOptions {
            currency: fixture.currency()?,
            ..StorefrontOptions::default()
        },
    );

    storefront.refresh().await?;

    Ok((backend, storefront))
}

#[tokio::test]
async fn stage_commit_and_exhaust_seats() -> TestResult {
    let (_backend, mut storefront) = session().await?;

    for _ in 0..3 {
        storefront.stage_increase(&math());
    }

    assert_eq!(storefront.add_to_cart(&math())?, 3);

    let line = storefront.cart().line(&math()).ok_or("missing line")?;

    assert_eq!(line.quantity(), 3);
    assert_eq!(line.subject(), "Math");
    assert_eq!(storefront.catalog().spaces(&math()), 2);

    assert_eq!(storefront.increase_cart_quantity(&math())?, 4);
    assert_eq!(storefront.increase_cart_quantity(&math())?, 5);
    assert_eq!(storefront.catalog().spaces(&math()), 0);

    assert_eq!(
        storefront.increase_cart_quantity(&math()),
        Err(CartError::InsufficientSpace {
            lesson: math(),
            requested: 1,
            available: 0,
        })
    );
    assert_eq!(storefront.cart().reserved(&math()), 5);

    let totals = storefront.totals();

    assert_eq!(totals.item_count, 5);
    assert_eq!(totals.total_price.to_minor_units(), 10_000);

    Ok(())
}

#[tokio::test]
async fn staging_is_clamped_to_available_seats() -> TestResult {
    let (_backend, mut storefront) = session().await?;

    for _ in 0..8 {
        storefront.stage_increase(&math());
    }

    assert_eq!(storefront.staged(&math()), 5);
    assert_eq!(storefront.catalog().spaces(&math()), 5);

    Ok(())
}

#[tokio::test]
async fn decrease_at_one_removes_the_line() -> TestResult {
    let (_backend, mut storefront) = session().await?;

    storefront.stage_increase(&math());
    storefront.add_to_cart(&math())?;

    let change = storefront.decrease_cart_quantity(&math())?;

    assert!(matches!(change, LineChange::Removed(_)));
    assert!(storefront.cart().is_empty());
    assert_eq!(storefront.catalog().spaces(&math()), 5);

    Ok(())
}

#[tokio::test]
async fn remove_then_readd_restores_seat_count() -> TestResult {
    let (_backend, mut storefront) = session().await?;

    storefront.stage_increase(&math());
    storefront.stage_increase(&math());
    storefront.add_to_cart(&math())?;

    let after_add = storefront.catalog().spaces(&math());

    storefront.remove_from_cart(&math())?;

    assert_eq!(storefront.catalog().spaces(&math()), 5);

    storefront.stage_increase(&math());
    storefront.stage_increase(&math());
    storefront.add_to_cart(&math())?;

    assert_eq!(storefront.catalog().spaces(&math()), after_add);

    Ok(())
}

#[tokio::test]
async fn checkout_persists_order_and_seats() -> TestResult {
    let (backend, mut storefront) = session().await?;

    storefront.stage_increase(&math());
    storefront.stage_increase(&math());
    storefront.add_to_cart(&math())?;

    let order = storefront
        .checkout(CheckoutForm::new("  John Doe ", " 12345 "))
        .await?;

    assert_eq!(order.customer_name, "John Doe");
    assert_eq!(order.customer_phone, "12345");
    assert_eq!(order.total_price.to_minor_units(), 4000);
    assert_eq!(backend.orders().await.len(), 1);
    assert_eq!(backend.spaces("m1").await, Some(3));

    storefront.continue_shopping().await?;

    assert!(storefront.cart().is_empty());
    assert_eq!(storefront.checkout_state(), &CheckoutState::Shopping);
    assert_eq!(storefront.catalog().spaces(&math()), 3);

    let notices: Vec<String> = storefront
        .drain_notices()
        .into_iter()
        .map(|notice| notice.message)
        .collect();

    assert_eq!(
        notices.last().map(String::as_str),
        Some("Order completed successfully")
    );

    Ok(())
}

#[tokio::test]
async fn partial_checkout_keeps_cart_until_retry() -> TestResult {
    let (backend, mut storefront) = session().await?;

    backend.reject_space_updates(true).await;

    storefront.stage_increase(&math());
    storefront.add_to_cart(&math())?;

    let result = storefront.checkout(CheckoutForm::new("John Doe", "12345")).await;

    assert!(matches!(result, Err(CheckoutError::PartialCheckout(_))));
    assert_eq!(backend.orders().await.len(), 1);
    assert_eq!(backend.spaces("m1").await, Some(5));
    assert_eq!(storefront.cart().item_count(), 1);
    assert!(matches!(
        storefront.continue_shopping().await,
        Err(CheckoutError::NotConfirmed)
    ));

    backend.reject_space_updates(false).await;

    storefront.retry_space_updates().await?;
    storefront.continue_shopping().await?;

    assert_eq!(backend.orders().await.len(), 1);
    assert_eq!(backend.spaces("m1").await, Some(4));
    assert_eq!(storefront.catalog().spaces(&math()), 4);

    Ok(())
}

#[tokio::test]
async fn offline_backend_keeps_last_catalog() -> TestResult {
    let (backend, mut storefront) = session().await?;

    backend.set_offline(true).await;

    assert!(storefront.refresh().await.is_err());
    assert_eq!(storefront.catalog().len(), 10);

    let result = storefront.checkout(CheckoutForm::new("John Doe", "12345")).await;

    assert!(matches!(result, Err(CheckoutError::EmptyCart)));

    Ok(())
}

#[tokio::test]
async fn sorted_views_are_stable() -> TestResult {
    let (_backend, storefront) = session().await?;

    let first: Vec<String> = storefront
        .sorted(SortField::Subject, SortOrder::Asc)
        .iter()
        .map(|lesson| lesson.subject.clone())
        .collect();
    let second: Vec<String> = storefront
        .sorted(SortField::Subject, SortOrder::Asc)
        .iter()
        .map(|lesson| lesson.subject.clone())
        .collect();

    assert_eq!(first, second);
    assert_eq!(first.first().map(String::as_str), Some("Art"));
    assert_eq!(first.last().map(String::as_str), Some("Physics"));

    let cheapest_last = storefront.sorted(SortField::Price, SortOrder::Desc);

    assert_eq!(
        cheapest_last.last().map(|lesson| lesson.subject.as_str()),
        Some("Art")
    );

    Ok(())
}
