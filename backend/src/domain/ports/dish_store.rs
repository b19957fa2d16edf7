//! Driven port for the dish collection and its embedded comments.
//!
//! Comment mutations are store-level conditional operations rather than
//! fetch-mutate-save round trips, so the existence checks they imply are
//! atomic with the write. Every mutation returns the freshly persisted dish
//! for the caller to hydrate.

use async_trait::async_trait;

use crate::domain::dish::{Comment, CommentId, CommentPatch, Dish, DishId, DishPatch};

/// Failures surfaced by a dish store implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DishStoreError {
    /// The addressed dish does not exist.
    #[error("dish {dish_id} does not exist")]
    DishMissing {
        /// The missing dish.
        dish_id: DishId,
    },
    /// The addressed comment does not exist on the dish.
    #[error("comment {comment_id} does not exist on dish {dish_id}")]
    CommentMissing {
        /// The dish that was addressed.
        dish_id: DishId,
        /// The missing comment.
        comment_id: CommentId,
    },
    /// The unique dish-name invariant would be violated.
    #[error("a dish named '{name}' already exists")]
    DuplicateName {
        /// The contested name.
        name: String,
    },
    /// The backing store failed.
    #[error("dish store failure: {message}")]
    Storage {
        /// Store-reported description, for logs only.
        message: String,
    },
}

impl DishStoreError {
    /// Construct a [`DishStoreError::Storage`] value.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Persists dishes and applies conditional mutations to their comments.
#[async_trait]
pub trait DishStore: Send + Sync {
    /// All dishes, in insertion order.
    async fn list(&self) -> Result<Vec<Dish>, DishStoreError>;

    /// Look up one dish.
    async fn find(&self, id: &DishId) -> Result<Option<Dish>, DishStoreError>;

    /// Persist a new dish, enforcing name uniqueness.
    async fn insert(&self, dish: Dish) -> Result<Dish, DishStoreError>;

    /// Apply a partial update to a dish.
    async fn update(&self, id: &DishId, patch: DishPatch) -> Result<Dish, DishStoreError>;

    /// Remove one dish entirely.
    async fn remove(&self, id: &DishId) -> Result<(), DishStoreError>;

    /// Remove every dish.
    async fn clear(&self) -> Result<(), DishStoreError>;

    /// Append a comment to a dish's ordered list.
    async fn append_comment(
        &self,
        dish_id: &DishId,
        comment: Comment,
    ) -> Result<Dish, DishStoreError>;

    /// Apply a partial update to one comment.
    async fn update_comment(
        &self,
        dish_id: &DishId,
        comment_id: &CommentId,
        patch: CommentPatch,
    ) -> Result<Dish, DishStoreError>;

    /// Remove exactly one comment from the ordered list.
    async fn remove_comment(
        &self,
        dish_id: &DishId,
        comment_id: &CommentId,
    ) -> Result<Dish, DishStoreError>;

    /// Empty a dish's comment list, leaving the dish in place.
    async fn clear_comments(&self, dish_id: &DishId) -> Result<Dish, DishStoreError>;
}
