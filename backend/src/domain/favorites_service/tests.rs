//! Regression coverage for favourites use-cases.

use std::sync::Arc;

use chrono::Utc;
use mockable::{Clock, DefaultClock};

use super::*;
use crate::domain::dish::Dish;
use crate::domain::ports::DishStore;
use crate::domain::ErrorCode;
use crate::outbound::persistence::{MemoryDishStore, MemoryFavoritesStore};

struct Harness {
    service: FavoritesService,
    dishes: Arc<MemoryDishStore>,
}

fn harness() -> Harness {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let dishes = Arc::new(MemoryDishStore::new(clock.clone()));
    let favorites = Arc::new(MemoryFavoritesStore::new(clock));
    let service = FavoritesService::new(favorites, dishes.clone());
    Harness { service, dishes }
}

async fn seed_dish(harness: &Harness, name: &str) -> DishId {
    let now = Utc::now();
    let dish = Dish {
        id: DishId::random(),
        name: name.to_owned(),
        description: "a dish".to_owned(),
        image: "images/dish.png".to_owned(),
        category: "mains".to_owned(),
        label: String::new(),
        price_cents: 899,
        featured: false,
        comments: Vec::new(),
        created_at: now,
        updated_at: now,
    };
    harness.dishes.insert(dish).await.expect("dish inserts").id
}

#[tokio::test]
async fn single_add_conflicts_on_duplicates_and_leaves_the_set_alone() {
    let harness = harness();
    let owner = IdentityId::random();
    let dish = seed_dish(&harness, "Uthappizza").await;

    let view = harness
        .service
        .add(&owner, dish)
        .await
        .expect("first add succeeds");
    assert_eq!(view.dishes.len(), 1);
    assert_eq!(view.dishes[0].id, dish);

    let err = harness
        .service
        .add(&owner, dish)
        .await
        .expect_err("duplicate add must conflict");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(
        err.details().and_then(|d| d.get("code")).and_then(|c| c.as_str()),
        Some("already_favorited")
    );

    let unchanged = harness
        .service
        .get(&owner)
        .await
        .expect("get runs")
        .expect("record exists");
    assert_eq!(unchanged.dishes.len(), 1);
}

#[tokio::test]
async fn batch_add_merges_idempotently() {
    let harness = harness();
    let owner = IdentityId::random();
    let existing = seed_dish(&harness, "Zucchipakoda").await;
    let fresh = seed_dish(&harness, "Vadonut").await;
    harness
        .service
        .add(&owner, existing)
        .await
        .expect("seed add");

    // Overlap with the stored set and a duplicate inside the input; the
    // batch must not abort.
    let view = harness
        .service
        .add_batch(&owner, vec![existing, fresh, fresh])
        .await
        .expect("batch add merges");
    let ids: Vec<_> = view.dishes.iter().map(|dish| dish.id).collect();
    assert_eq!(ids, vec![existing, fresh]);
}

#[tokio::test]
async fn batch_add_creates_a_first_time_record_without_duplicates() {
    let harness = harness();
    let owner = IdentityId::random();
    let dish = seed_dish(&harness, "ElaiCheese Cake").await;
    let view = harness
        .service
        .add_batch(&owner, vec![dish, dish])
        .await
        .expect("first batch add");
    assert_eq!(view.dishes.len(), 1);
}

#[tokio::test]
async fn remove_distinguishes_set_and_entry_absence() {
    let harness = harness();
    let owner = IdentityId::random();
    let dish = seed_dish(&harness, "Uthappizza").await;

    let no_set = harness
        .service
        .remove(&owner, &dish)
        .await
        .expect_err("no record yet");
    assert_eq!(no_set.code(), ErrorCode::NotFound);
    assert_eq!(
        no_set.details().and_then(|d| d.get("code")).and_then(|c| c.as_str()),
        Some("favorites_not_found")
    );

    harness.service.add(&owner, dish).await.expect("seed add");
    let ghost = DishId::random();
    let no_entry = harness
        .service
        .remove(&owner, &ghost)
        .await
        .expect_err("entry absent");
    assert_eq!(no_entry.code(), ErrorCode::NotFound);
    assert_eq!(
        no_entry.details().and_then(|d| d.get("code")).and_then(|c| c.as_str()),
        Some("favorite_entry_not_found")
    );

    let emptied = harness
        .service
        .remove(&owner, &dish)
        .await
        .expect("remove succeeds");
    assert!(emptied.dishes.is_empty());
}

#[tokio::test]
async fn emptied_record_is_distinct_from_never_favourited() {
    let harness = harness();
    let owner = IdentityId::random();
    assert!(harness
        .service
        .get(&owner)
        .await
        .expect("get runs")
        .is_none());

    let dish = seed_dish(&harness, "Vadonut").await;
    harness.service.add(&owner, dish).await.expect("add");
    harness
        .service
        .remove(&owner, &dish)
        .await
        .expect("remove");

    let lookup = harness.service.get(&owner).await.expect("get runs");
    let view = lookup.expect("record survives being emptied");
    assert!(view.dishes.is_empty());
}

#[tokio::test]
async fn clear_deletes_the_record_and_requires_one() {
    let harness = harness();
    let owner = IdentityId::random();
    let err = harness
        .service
        .clear(&owner)
        .await
        .expect_err("nothing to clear");
    assert_eq!(err.code(), ErrorCode::NotFound);

    let dish = seed_dish(&harness, "Uthappizza").await;
    harness.service.add(&owner, dish).await.expect("add");
    harness.service.clear(&owner).await.expect("clear");
    assert!(harness
        .service
        .get(&owner)
        .await
        .expect("get runs")
        .is_none());
}

#[tokio::test]
async fn contains_probe_never_mutates() {
    let harness = harness();
    let owner = IdentityId::random();
    let dish = seed_dish(&harness, "Zucchipakoda").await;
    assert!(!harness
        .service
        .contains(&owner, &dish)
        .await
        .expect("probe runs"));
    // Probing must not have created a record.
    assert!(harness
        .service
        .get(&owner)
        .await
        .expect("get runs")
        .is_none());

    harness.service.add(&owner, dish).await.expect("add");
    assert!(harness
        .service
        .contains(&owner, &dish)
        .await
        .expect("probe runs"));
}

#[tokio::test]
async fn hydration_skips_references_to_removed_dishes() {
    let harness = harness();
    let owner = IdentityId::random();
    let keeper = seed_dish(&harness, "Keeper").await;
    let goner = seed_dish(&harness, "Goner").await;
    harness.service.add(&owner, keeper).await.expect("add");
    harness.service.add(&owner, goner).await.expect("add");

    harness.dishes.remove(&goner).await.expect("dish removed");
    let view = harness
        .service
        .get(&owner)
        .await
        .expect("get runs")
        .expect("record exists");
    let ids: Vec<_> = view.dishes.iter().map(|dish| dish.id).collect();
    assert_eq!(ids, vec![keeper]);
}
