//! In-memory dish store adapter.
//!
//! Comment mutations are remove-by-id operations on the embedded ordered
//! list, applied under the collection write lock so the existence check and
//! the write cannot be separated by another request.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tokio::sync::RwLock;

use crate::domain::dish::{Comment, CommentId, CommentPatch, Dish, DishId, DishPatch};
use crate::domain::ports::{DishStore, DishStoreError};

/// Dish records guarded by one collection-wide lock.
pub struct MemoryDishStore {
    records: RwLock<Vec<Dish>>,
    clock: Arc<dyn Clock>,
}

impl MemoryDishStore {
    /// Create an empty store stamping timestamps from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            clock,
        }
    }
}

fn missing(dish_id: &DishId) -> DishStoreError {
    DishStoreError::DishMissing { dish_id: *dish_id }
}

#[async_trait]
impl DishStore for MemoryDishStore {
    async fn list(&self) -> Result<Vec<Dish>, DishStoreError> {
        Ok(self.records.read().await.clone())
    }

    async fn find(&self, id: &DishId) -> Result<Option<Dish>, DishStoreError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|dish| dish.id == *id).cloned())
    }

    async fn insert(&self, dish: Dish) -> Result<Dish, DishStoreError> {
        let mut records = self.records.write().await;
        if records.iter().any(|existing| existing.name == dish.name) {
            return Err(DishStoreError::DuplicateName { name: dish.name });
        }
        records.push(dish.clone());
        Ok(dish)
    }

    async fn update(&self, id: &DishId, patch: DishPatch) -> Result<Dish, DishStoreError> {
        let mut records = self.records.write().await;
        let dish = records
            .iter_mut()
            .find(|dish| dish.id == *id)
            .ok_or_else(|| missing(id))?;
        if let Some(name) = patch.name {
            dish.name = name;
        }
        if let Some(description) = patch.description {
            dish.description = description;
        }
        if let Some(image) = patch.image {
            dish.image = image;
        }
        if let Some(category) = patch.category {
            dish.category = category;
        }
        if let Some(label) = patch.label {
            dish.label = label;
        }
        if let Some(price_cents) = patch.price_cents {
            dish.price_cents = price_cents;
        }
        if let Some(featured) = patch.featured {
            dish.featured = featured;
        }
        dish.updated_at = self.clock.utc();
        Ok(dish.clone())
    }

    async fn remove(&self, id: &DishId) -> Result<(), DishStoreError> {
        let mut records = self.records.write().await;
        let index = records
            .iter()
            .position(|dish| dish.id == *id)
            .ok_or_else(|| missing(id))?;
        records.remove(index);
        Ok(())
    }

    async fn clear(&self) -> Result<(), DishStoreError> {
        self.records.write().await.clear();
        Ok(())
    }

    async fn append_comment(
        &self,
        dish_id: &DishId,
        comment: Comment,
    ) -> Result<Dish, DishStoreError> {
        let mut records = self.records.write().await;
        let dish = records
            .iter_mut()
            .find(|dish| dish.id == *dish_id)
            .ok_or_else(|| missing(dish_id))?;
        dish.comments.push(comment);
        dish.updated_at = self.clock.utc();
        Ok(dish.clone())
    }

    async fn update_comment(
        &self,
        dish_id: &DishId,
        comment_id: &CommentId,
        patch: CommentPatch,
    ) -> Result<Dish, DishStoreError> {
        let now = self.clock.utc();
        let mut records = self.records.write().await;
        let dish = records
            .iter_mut()
            .find(|dish| dish.id == *dish_id)
            .ok_or_else(|| missing(dish_id))?;
        let comment = dish
            .comments
            .iter_mut()
            .find(|comment| comment.id == *comment_id)
            .ok_or(DishStoreError::CommentMissing {
                dish_id: *dish_id,
                comment_id: *comment_id,
            })?;
        if let Some(rating) = patch.rating {
            comment.rating = rating;
        }
        if let Some(text) = patch.text {
            comment.text = text;
        }
        comment.updated_at = now;
        dish.updated_at = now;
        Ok(dish.clone())
    }

    async fn remove_comment(
        &self,
        dish_id: &DishId,
        comment_id: &CommentId,
    ) -> Result<Dish, DishStoreError> {
        let mut records = self.records.write().await;
        let dish = records
            .iter_mut()
            .find(|dish| dish.id == *dish_id)
            .ok_or_else(|| missing(dish_id))?;
        let index = dish
            .comments
            .iter()
            .position(|comment| comment.id == *comment_id)
            .ok_or(DishStoreError::CommentMissing {
                dish_id: *dish_id,
                comment_id: *comment_id,
            })?;
        dish.comments.remove(index);
        dish.updated_at = self.clock.utc();
        Ok(dish.clone())
    }

    async fn clear_comments(&self, dish_id: &DishId) -> Result<Dish, DishStoreError> {
        let mut records = self.records.write().await;
        let dish = records
            .iter_mut()
            .find(|dish| dish.id == *dish_id)
            .ok_or_else(|| missing(dish_id))?;
        dish.comments.clear();
        dish.updated_at = self.clock.utc();
        Ok(dish.clone())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::dish::Rating;
    use crate::domain::identity::IdentityId;
    use chrono::Utc;
    use mockable::DefaultClock;

    fn store() -> MemoryDishStore {
        MemoryDishStore::new(Arc::new(DefaultClock))
    }

    fn dish(name: &str) -> Dish {
        let now = Utc::now();
        Dish {
            id: DishId::random(),
            name: name.to_owned(),
            description: "a dish".to_owned(),
            image: "images/dish.png".to_owned(),
            category: "mains".to_owned(),
            label: String::new(),
            price_cents: 1299,
            featured: false,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn comment(author: IdentityId, text: &str) -> Comment {
        let now = Utc::now();
        Comment {
            id: CommentId::random(),
            rating: Rating::new(4).expect("valid rating"),
            text: text.to_owned(),
            author,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn duplicate_dish_names_are_rejected() {
        let store = store();
        store.insert(dish("Uthappizza")).await.expect("insert");
        let err = store
            .insert(dish("Uthappizza"))
            .await
            .expect_err("duplicate name must fail");
        assert!(matches!(err, DishStoreError::DuplicateName { .. }));
    }

    #[tokio::test]
    async fn comment_mutations_address_exactly_one_entry() {
        let store = store();
        let stored = store.insert(dish("Zucchipakoda")).await.expect("insert");
        let author = IdentityId::random();
        let first = comment(author, "first");
        let second = comment(author, "second");
        let first_id = first.id;
        store
            .append_comment(&stored.id, first)
            .await
            .expect("append");
        let with_both = store
            .append_comment(&stored.id, second)
            .await
            .expect("append");
        assert_eq!(with_both.comments.len(), 2);

        let after_remove = store
            .remove_comment(&stored.id, &first_id)
            .await
            .expect("remove one entry");
        assert_eq!(after_remove.comments.len(), 1);
        assert_eq!(after_remove.comments[0].text, "second");

        let err = store
            .remove_comment(&stored.id, &first_id)
            .await
            .expect_err("removing again must fail");
        assert!(matches!(err, DishStoreError::CommentMissing { .. }));
    }

    #[tokio::test]
    async fn partial_comment_update_keeps_other_fields() {
        let store = store();
        let stored = store.insert(dish("Vadonut")).await.expect("insert");
        let entry = comment(IdentityId::random(), "original");
        let entry_id = entry.id;
        store
            .append_comment(&stored.id, entry)
            .await
            .expect("append");

        let patch = CommentPatch {
            rating: Some(Rating::new(2).expect("valid rating")),
            text: None,
        };
        let updated = store
            .update_comment(&stored.id, &entry_id, patch)
            .await
            .expect("patch applies");
        let patched = updated
            .find_comment(&entry_id)
            .expect("comment still present");
        assert_eq!(patched.rating.value(), 2);
        assert_eq!(patched.text, "original");
    }

    #[tokio::test]
    async fn clearing_comments_keeps_the_dish() {
        let store = store();
        let stored = store.insert(dish("ElaiCheese Cake")).await.expect("insert");
        store
            .append_comment(&stored.id, comment(IdentityId::random(), "tasty"))
            .await
            .expect("append");
        let cleared = store
            .clear_comments(&stored.id)
            .await
            .expect("clear comments");
        assert!(cleared.comments.is_empty());
        assert!(store.find(&stored.id).await.expect("find").is_some());
    }

    #[tokio::test]
    async fn missing_dish_is_reported_for_every_mutation() {
        let store = store();
        let ghost = DishId::random();
        assert!(matches!(
            store.clear_comments(&ghost).await,
            Err(DishStoreError::DishMissing { .. })
        ));
        assert!(matches!(
            store.remove(&ghost).await,
            Err(DishStoreError::DishMissing { .. })
        ));
    }
}
