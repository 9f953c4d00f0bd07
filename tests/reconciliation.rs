//! Seat accounting across cart operations and catalog reloads.
//!
//! For every lesson in the catalog, `spaces + backed == capacity` must hold after each cart
//! operation and again after each reload, where capacity is the seat count the backend reported
//! on the last reload and `backed` is the part of the cart's reservation the catalog paid for.

use std::sync::Arc;

use testresult::TestResult;

use seatcart::{
    cart::{Cart, CartLine},
    catalog::Catalog,
    fixtures::Fixture,
    gateway::MemoryBackend,
    lessons::LessonId,
    selection::Selections,
    storefront::{Storefront, StorefrontOptions},
};

fn assert_seats_balanced(catalog: &Catalog, cart: &Cart) {
    for lesson in catalog.records() {
        assert_eq!(
            lesson.spaces + cart.line(&lesson.id).map_or(0, CartLine::backed_quantity),
            lesson.capacity,
            "seat invariant broken for {}",
            lesson.id
        );
    }
}

#[test]
fn invariant_holds_over_an_operation_sequence() -> TestResult {
    let fixture = Fixture::from_set("scarce")?;
    let mut catalog = fixture.catalog();
    let mut selections = Selections::new();
    let mut cart = Cart::new();

    let ids: Vec<LessonId> = catalog.records().map(|lesson| lesson.id.clone()).collect();

    // Linear congruential sequence so every run exercises the same operations.
    let mut seed: u64 = 0x5eed;

    for _ in 0..500 {
        seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);

        let Some(lesson) = ids.get(usize::try_from(seed >> 33)? % ids.len()) else {
            continue;
        };

        match (seed >> 20) % 5 {
            0 => {
                selections.increase(&catalog, lesson);
                selections.increase(&catalog, lesson);
                // Refusals are part of the sequence; they must leave everything untouched.
                if cart.commit(&mut catalog, &mut selections, lesson).is_err() {
                    selections.clear(lesson);
                }
            }
            1 => {
                if cart.increase_line(&mut catalog, lesson).is_err() {
                    assert!(cart.line(lesson).is_none() || catalog.spaces(lesson) == 0);
                }
            }
            2 => {
                if cart.decrease_line(&mut catalog, lesson).is_err() {
                    assert!(cart.line(lesson).is_none());
                }
            }
            3 => {
                if cart.remove_line(&mut catalog, lesson).is_err() {
                    assert!(cart.line(lesson).is_none());
                }
            }
            _ => {
                selections.decrease(lesson);
            }
        }

        assert_seats_balanced(&catalog, &cart);
        assert!(cart.lines().all(|line| line.quantity() >= 1));
    }

    Ok(())
}

#[test]
fn reload_reapplies_reservations_against_fresh_counts() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let mut catalog = fixture.catalog();
    let mut selections = Selections::new();
    let mut cart = Cart::new();
    let math = LessonId::from("m1");

    selections.increase(&catalog, &math);
    selections.increase(&catalog, &math);
    cart.commit(&mut catalog, &mut selections, &math)?;

    assert_eq!(catalog.spaces(&math), 3);

    catalog.replace_all(fixture.lessons().iter().cloned());

    assert_eq!(catalog.spaces(&math), 5);

    let outcome = cart.reconcile(&mut catalog);

    assert_eq!(outcome.applied, 1);
    assert_eq!(catalog.spaces(&math), 3);
    assert_seats_balanced(&catalog, &cart);

    Ok(())
}

#[tokio::test]
async fn capacity_ten_reservation_four_stays_six_after_reload() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let backend = Arc::new(MemoryBackend::from_fixture(&fixture));

    backend.set_spaces("m1", 10).await;

    let mut storefront = Storefront::new(backend.clone(), StorefrontOptions::default());
    let math = LessonId::from("m1");

    storefront.refresh().await?;

    for _ in 0..4 {
        storefront.stage_increase(&math);
    }

    storefront.add_to_cart(&math)?;

    assert_eq!(storefront.catalog().spaces(&math), 6);

    storefront.refresh().await?;

    assert_eq!(storefront.catalog().spaces(&math), 6);
    assert_seats_balanced(storefront.catalog(), storefront.cart());

    Ok(())
}

#[tokio::test]
async fn reload_below_reservation_clamps_at_zero() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let backend = Arc::new(MemoryBackend::from_fixture(&fixture));
    let mut storefront = Storefront::new(backend.clone(), StorefrontOptions::default());
    let math = LessonId::from("m1");

    storefront.refresh().await?;

    for _ in 0..4 {
        storefront.stage_increase(&math);
    }

    storefront.add_to_cart(&math)?;

    // Another customer books most of the lesson in the meantime.
    backend.set_spaces("m1", 2).await;

    let outcome = storefront.refresh().await?;

    assert_eq!(outcome.clamped, vec![math.clone()]);
    assert_eq!(storefront.catalog().spaces(&math), 0);
    assert_eq!(storefront.cart().reserved(&math), 4);
    assert_seats_balanced(storefront.catalog(), storefront.cart());

    Ok(())
}

#[tokio::test]
async fn releasing_a_clamped_line_cannot_oversell() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let backend = Arc::new(MemoryBackend::from_fixture(&fixture));
    let mut storefront = Storefront::new(backend.clone(), StorefrontOptions::default());
    let math = LessonId::from("m1");

    storefront.refresh().await?;

    for _ in 0..4 {
        storefront.stage_increase(&math);
    }

    storefront.add_to_cart(&math)?;

    backend.set_spaces("m1", 2).await;
    storefront.refresh().await?;
    storefront.remove_from_cart(&math)?;

    let record = storefront
        .catalog()
        .find_by_id(&math)
        .ok_or("missing lesson")?;

    assert_eq!(record.spaces, 2);
    assert!(record.spaces <= record.capacity);

    for _ in 0..4 {
        storefront.stage_increase(&math);
    }

    assert_eq!(storefront.staged(&math), 2);
    assert_eq!(storefront.add_to_cart(&math)?, 2);
    assert_eq!(storefront.catalog().spaces(&math), 0);
    assert_seats_balanced(storefront.catalog(), storefront.cart());

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn lines_filtered_out_by_search_stay_in_cart() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let backend = Arc::new(MemoryBackend::from_fixture(&fixture));
    let mut storefront = Storefront::new(backend, StorefrontOptions::default());
    let math = LessonId::from("m1");
    let art = LessonId::from("a1");

    storefront.refresh().await?;
    storefront.stage_increase(&math);
    storefront.add_to_cart(&math)?;
    storefront.stage_increase(&art);
    storefront.add_to_cart(&art)?;

    storefront.schedule_search("leeds");

    let outcome = storefront
        .wait_for_search()
        .await
        .ok_or("no search pending")??;

    assert_eq!(outcome.missing, vec![math.clone()]);
    assert_eq!(storefront.catalog().len(), 1);
    assert_eq!(storefront.catalog().spaces(&art), 4);
    assert_eq!(storefront.cart().len(), 2);

    // The line survives outside the filtered catalog and can still be released.
    storefront.decrease_cart_quantity(&math)?;

    assert!(storefront.cart().line(&math).is_none());

    storefront.schedule_search("");
    storefront.wait_for_search().await.ok_or("no search pending")??;

    assert_eq!(storefront.catalog().len(), 10);
    assert_eq!(storefront.catalog().spaces(&math), 5);
    assert_eq!(storefront.catalog().spaces(&art), 4);
    assert_seats_balanced(storefront.catalog(), storefront.cart());

    Ok(())
}
