//! In-memory favourites store adapter.
//!
//! The duplicate check and the write share one write-guard critical
//! section, so concurrent adds of the same dish cannot both pass the "not
//! present" check. This is the conditional-update half of the favourites
//! correctness requirement.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tokio::sync::RwLock;

use crate::domain::dish::DishId;
use crate::domain::favorites::FavoritesSet;
use crate::domain::identity::IdentityId;
use crate::domain::ports::{FavoritesStore, FavoritesStoreError};

/// Favourites records keyed by owner, guarded by one collection-wide lock.
pub struct MemoryFavoritesStore {
    records: RwLock<HashMap<IdentityId, FavoritesSet>>,
    clock: Arc<dyn Clock>,
}

impl MemoryFavoritesStore {
    /// Create an empty store stamping timestamps from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            clock,
        }
    }
}

#[async_trait]
impl FavoritesStore for MemoryFavoritesStore {
    async fn find(
        &self,
        owner: &IdentityId,
    ) -> Result<Option<FavoritesSet>, FavoritesStoreError> {
        Ok(self.records.read().await.get(owner).cloned())
    }

    async fn add(
        &self,
        owner: &IdentityId,
        dish_id: DishId,
    ) -> Result<FavoritesSet, FavoritesStoreError> {
        let now = self.clock.utc();
        let mut records = self.records.write().await;
        let record = records
            .entry(*owner)
            .or_insert_with(|| FavoritesSet::empty(*owner, now));
        if record.contains(&dish_id) {
            return Err(FavoritesStoreError::AlreadyPresent { dish_id });
        }
        record.dishes.push(dish_id);
        record.updated_at = now;
        Ok(record.clone())
    }

    async fn merge(
        &self,
        owner: &IdentityId,
        dish_ids: Vec<DishId>,
    ) -> Result<FavoritesSet, FavoritesStoreError> {
        let now = self.clock.utc();
        let mut records = self.records.write().await;
        let record = records
            .entry(*owner)
            .or_insert_with(|| FavoritesSet::empty(*owner, now));
        let mut changed = false;
        for dish_id in dish_ids {
            // Checking against the growing list also drops duplicates that
            // appear within the input itself.
            if !record.contains(&dish_id) {
                record.dishes.push(dish_id);
                changed = true;
            }
        }
        if changed {
            record.updated_at = now;
        }
        Ok(record.clone())
    }

    async fn remove(
        &self,
        owner: &IdentityId,
        dish_id: &DishId,
    ) -> Result<FavoritesSet, FavoritesStoreError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(owner)
            .ok_or(FavoritesStoreError::SetMissing)?;
        let index = record
            .dishes
            .iter()
            .position(|entry| entry == dish_id)
            .ok_or(FavoritesStoreError::EntryMissing { dish_id: *dish_id })?;
        record.dishes.remove(index);
        record.updated_at = self.clock.utc();
        Ok(record.clone())
    }

    async fn clear(&self, owner: &IdentityId) -> Result<(), FavoritesStoreError> {
        let mut records = self.records.write().await;
        records
            .remove(owner)
            .map(|_| ())
            .ok_or(FavoritesStoreError::SetMissing)
    }
}
