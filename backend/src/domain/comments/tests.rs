//! Regression coverage for comment use-cases.

use std::sync::Arc;

use chrono::Utc;
use mockable::DefaultClock;

use super::*;
use crate::domain::dish::{Dish, DishId, Rating};
use crate::domain::identity::IdentityId;
use crate::domain::ErrorCode;
use crate::outbound::persistence::{MemoryCredentialStore, MemoryDishStore};

struct Harness {
    service: CommentService,
    dishes: Arc<MemoryDishStore>,
    identities: Arc<MemoryCredentialStore>,
}

fn harness() -> Harness {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let dishes = Arc::new(MemoryDishStore::new(clock.clone()));
    let identities = Arc::new(MemoryCredentialStore::new());
    let service = CommentService::new(dishes.clone(), identities.clone(), clock);
    Harness {
        service,
        dishes,
        identities,
    }
}

async fn register(harness: &Harness, username: &str, is_admin: bool) -> Identity {
    let identity = Identity {
        id: IdentityId::random(),
        username: username.to_owned(),
        credential: None,
        first_name: None,
        last_name: None,
        is_admin,
        external_id: None,
        created_at: Utc::now(),
    };
    harness
        .identities
        .insert(identity)
        .await
        .expect("identity inserts")
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
        price_cents: 999,
        featured: false,
        comments: Vec::new(),
        created_at: now,
        updated_at: now,
    };
    harness.dishes.insert(dish).await.expect("dish inserts").id
}

fn draft(rating: u8, text: &str) -> CommentDraft {
    CommentDraft {
        rating: Rating::new(rating).expect("valid rating"),
        text: text.to_owned(),
    }
}

#[tokio::test]
async fn add_stamps_the_caller_as_author_and_hydrates() {
    let harness = harness();
    let bob = register(&harness, "bob", false).await;
    let dish_id = seed_dish(&harness, "Uthappizza").await;

    let view = harness
        .service
        .add(&dish_id, &bob, draft(5, "excellent"))
        .await
        .expect("comment posts");
    assert_eq!(view.comments.len(), 1);
    let author = view.comments[0].author.as_ref().expect("author hydrated");
    assert_eq!(author.id, bob.id);
    assert_eq!(author.username, "bob");
}

#[tokio::test]
async fn add_to_a_missing_dish_is_not_found() {
    let harness = harness();
    let bob = register(&harness, "bob", false).await;
    let err = harness
        .service
        .add(&DishId::random(), &bob, draft(3, "hello"))
        .await
        .expect_err("missing dish must fail");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn update_is_strictly_author_only_even_for_admins() {
    let harness = harness();
    let bob = register(&harness, "bob", false).await;
    let carol = register(&harness, "carol", false).await;
    let dave = register(&harness, "dave", true).await;
    let dish_id = seed_dish(&harness, "Zucchipakoda").await;

    let view = harness
        .service
        .add(&dish_id, &bob, draft(4, "original"))
        .await
        .expect("comment posts");
    let comment_id = view.comments[0].id;

    let patch = CommentPatch {
        rating: None,
        text: Some("defaced".to_owned()),
    };
    let carol_err = harness
        .service
        .update(&dish_id, &comment_id, &carol, patch.clone())
        .await
        .expect_err("non-author must be refused");
    assert_eq!(carol_err.code(), ErrorCode::Forbidden);

    // The admin role does not bypass comment ownership.
    let dave_err = harness
        .service
        .update(&dish_id, &comment_id, &dave, patch.clone())
        .await
        .expect_err("admin must be refused too");
    assert_eq!(dave_err.code(), ErrorCode::Forbidden);

    let updated = harness
        .service
        .update(&dish_id, &comment_id, &bob, patch)
        .await
        .expect("author may update");
    let comment = updated
        .comments
        .iter()
        .find(|comment| comment.id == comment_id)
        .expect("comment present");
    assert_eq!(comment.text, "defaced");
    // Partial update: the rating was not in the patch and is unchanged.
    assert_eq!(comment.rating.value(), 4);
}

#[tokio::test]
async fn delete_removes_exactly_the_addressed_entry() {
    let harness = harness();
    let bob = register(&harness, "bob", false).await;
    let dish_id = seed_dish(&harness, "Vadonut").await;

    let first = harness
        .service
        .add(&dish_id, &bob, draft(5, "first"))
        .await
        .expect("comment posts");
    let first_id = first.comments[0].id;
    harness
        .service
        .add(&dish_id, &bob, draft(3, "second"))
        .await
        .expect("comment posts");

    let carol = register(&harness, "carol", false).await;
    let err = harness
        .service
        .delete(&dish_id, &first_id, &carol)
        .await
        .expect_err("non-author must be refused");
    assert_eq!(err.code(), ErrorCode::Forbidden);

    let view = harness
        .service
        .delete(&dish_id, &first_id, &bob)
        .await
        .expect("author may delete");
    assert_eq!(view.comments.len(), 1);
    assert_eq!(view.comments[0].text, "second");

    let missing = harness
        .service
        .delete(&dish_id, &first_id, &bob)
        .await
        .expect_err("second delete must fail");
    assert_eq!(missing.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn delete_all_empties_the_list_but_keeps_the_dish() {
    let harness = harness();
    let bob = register(&harness, "bob", false).await;
    let dish_id = seed_dish(&harness, "ElaiCheese Cake").await;
    for text in ["one", "two", "three"] {
        harness
            .service
            .add(&dish_id, &bob, draft(4, text))
            .await
            .expect("comment posts");
    }

    let view = harness
        .service
        .delete_all(&dish_id)
        .await
        .expect("bulk clear runs");
    assert!(view.comments.is_empty());
    assert_eq!(view.name, "ElaiCheese Cake");
}

#[tokio::test]
async fn reads_hydrate_in_list_order() {
    let harness = harness();
    let bob = register(&harness, "bob", false).await;
    let dish_id = seed_dish(&harness, "Order Check").await;
    for text in ["first", "second"] {
        harness
            .service
            .add(&dish_id, &bob, draft(2, text))
            .await
            .expect("comment posts");
    }
    let comments = harness.service.list(&dish_id).await.expect("list runs");
    let texts: Vec<_> = comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second"]);

    let single = harness
        .service
        .get(&dish_id, &comments[1].id)
        .await
        .expect("get runs");
    assert_eq!(single.text, "second");
}
