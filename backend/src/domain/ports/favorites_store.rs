//! Driven port for per-identity favourites records.
//!
//! The duplicate check and the write happen inside one store operation, so
//! two concurrent adds for the same identity and dish cannot both pass a
//! "not present" check; one of them observes the other's write.

use async_trait::async_trait;

use crate::domain::dish::DishId;
use crate::domain::favorites::FavoritesSet;
use crate::domain::identity::IdentityId;

/// Failures surfaced by a favourites store implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FavoritesStoreError {
    /// The dish reference is already in the set.
    #[error("dish {dish_id} is already in the favourites list")]
    AlreadyPresent {
        /// The duplicate reference.
        dish_id: DishId,
    },
    /// The identity has no favourites record at all.
    #[error("no favourites record exists for this identity")]
    SetMissing,
    /// The record exists but does not contain the reference.
    #[error("dish {dish_id} is not in the favourites list")]
    EntryMissing {
        /// The absent reference.
        dish_id: DishId,
    },
    /// The backing store failed.
    #[error("favourites store failure: {message}")]
    Storage {
        /// Store-reported description, for logs only.
        message: String,
    },
}

impl FavoritesStoreError {
    /// Construct a [`FavoritesStoreError::Storage`] value.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Persists favourites records with conditional, duplicate-free mutation.
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    /// The identity's record, if one was ever created.
    async fn find(&self, owner: &IdentityId)
        -> Result<Option<FavoritesSet>, FavoritesStoreError>;

    /// Add one reference, creating the record lazily.
    ///
    /// Fails with [`FavoritesStoreError::AlreadyPresent`] when the reference
    /// is already in the set; the set is left untouched.
    async fn add(
        &self,
        owner: &IdentityId,
        dish_id: DishId,
    ) -> Result<FavoritesSet, FavoritesStoreError>;

    /// Merge several references, creating the record lazily.
    ///
    /// References already present (or repeated within `dish_ids`) are
    /// silently skipped; a batch import must not abort on partial overlap.
    async fn merge(
        &self,
        owner: &IdentityId,
        dish_ids: Vec<DishId>,
    ) -> Result<FavoritesSet, FavoritesStoreError>;

    /// Remove one reference.
    async fn remove(
        &self,
        owner: &IdentityId,
        dish_id: &DishId,
    ) -> Result<FavoritesSet, FavoritesStoreError>;

    /// Delete the whole record.
    async fn clear(&self, owner: &IdentityId) -> Result<(), FavoritesStoreError>;
}
