//! Favourites use-cases, scoped to the authenticated identity.
//!
//! The single add errors on a duplicate while the batch add merges
//! idempotently; the asymmetry is the observed product behaviour and is
//! preserved deliberately rather than unified.

use std::sync::Arc;

use serde_json::json;

use super::dish::{DishId, DishSummary};
use super::favorites::{FavoritesSet, FavoritesView};
use super::identity::IdentityId;
use super::ports::{DishStore, FavoritesStore, FavoritesStoreError};
use super::Error;

/// Favourites service over the favourites and dish stores.
pub struct FavoritesService {
    favorites: Arc<dyn FavoritesStore>,
    dishes: Arc<dyn DishStore>,
}

impl FavoritesService {
    /// Assemble the service from its collaborators.
    pub fn new(favorites: Arc<dyn FavoritesStore>, dishes: Arc<dyn DishStore>) -> Self {
        Self { favorites, dishes }
    }

    fn map_store_error(error: FavoritesStoreError) -> Error {
        match error {
            FavoritesStoreError::AlreadyPresent { dish_id } => Error::conflict(format!(
                "dish {dish_id} is already in your favourites list"
            ))
            .with_details(json!({ "code": "already_favorited" })),
            FavoritesStoreError::SetMissing => {
                Error::not_found("you have not favourited anything yet")
                    .with_details(json!({ "code": "favorites_not_found" }))
            }
            FavoritesStoreError::EntryMissing { dish_id } => Error::not_found(format!(
                "dish {dish_id} is not in your favourites list"
            ))
            .with_details(json!({ "code": "favorite_entry_not_found" })),
            FavoritesStoreError::Storage { message } => {
                Error::internal(format!("favourites store error: {message}"))
            }
        }
    }

    /// Hydrate dish references into summaries, skipping references whose
    /// dish has since been removed from the catalogue.
    async fn hydrate(&self, set: FavoritesSet) -> Result<FavoritesView, Error> {
        let mut dishes = Vec::with_capacity(set.dishes.len());
        for dish_id in &set.dishes {
            let found = self
                .dishes
                .find(dish_id)
                .await
                .map_err(super::dishes::map_dish_store_error)?;
            if let Some(dish) = found {
                dishes.push(DishSummary::from(&dish));
            }
        }
        Ok(FavoritesView {
            owner: set.owner,
            dishes,
            created_at: set.created_at,
            updated_at: set.updated_at,
        })
    }

    /// The identity's favourites, hydrated.
    ///
    /// `None` means the identity has never favourited anything, which is
    /// distinct from a record with an empty dish list.
    pub async fn get(&self, owner: &IdentityId) -> Result<Option<FavoritesView>, Error> {
        match self
            .favorites
            .find(owner)
            .await
            .map_err(Self::map_store_error)?
        {
            Some(set) => Ok(Some(self.hydrate(set).await?)),
            None => Ok(None),
        }
    }

    /// Whether `dish_id` is currently referenced, without mutating anything.
    pub async fn contains(&self, owner: &IdentityId, dish_id: &DishId) -> Result<bool, Error> {
        Ok(self
            .favorites
            .find(owner)
            .await
            .map_err(Self::map_store_error)?
            .is_some_and(|set| set.contains(dish_id)))
    }

    /// Add one dish reference; duplicates are a conflict, never a no-op.
    pub async fn add(&self, owner: &IdentityId, dish_id: DishId) -> Result<FavoritesView, Error> {
        let set = self
            .favorites
            .add(owner, dish_id)
            .await
            .map_err(Self::map_store_error)?;
        self.hydrate(set).await
    }

    /// Merge several dish references, silently skipping duplicates.
    pub async fn add_batch(
        &self,
        owner: &IdentityId,
        dish_ids: Vec<DishId>,
    ) -> Result<FavoritesView, Error> {
        let set = self
            .favorites
            .merge(owner, dish_ids)
            .await
            .map_err(Self::map_store_error)?;
        self.hydrate(set).await
    }

    /// Remove one dish reference.
    pub async fn remove(
        &self,
        owner: &IdentityId,
        dish_id: &DishId,
    ) -> Result<FavoritesView, Error> {
        let set = self
            .favorites
            .remove(owner, dish_id)
            .await
            .map_err(Self::map_store_error)?;
        self.hydrate(set).await
    }

    /// Delete the whole favourites record.
    pub async fn clear(&self, owner: &IdentityId) -> Result<(), Error> {
        self.favorites
            .clear(owner)
            .await
            .map_err(Self::map_store_error)
    }
}

#[cfg(test)]
mod tests;
