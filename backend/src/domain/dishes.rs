//! Dish catalogue use-cases.
//!
//! Plain CRUD over the dish collection. Role gating (admin for mutation)
//! is route-level policy; this service only owns store translation and
//! hydration of comment authors into client-visible views.

use std::sync::Arc;

use mockable::Clock;
use serde_json::json;

use super::dish::{Comment, CommentView, Dish, DishDraft, DishId, DishPatch, DishView};
use super::ports::{CredentialStore, CredentialStoreError, DishStore, DishStoreError};
use super::Error;

/// Translate a dish store failure into the domain taxonomy.
pub(crate) fn map_dish_store_error(error: DishStoreError) -> Error {
    match error {
        DishStoreError::DishMissing { dish_id } => {
            Error::not_found(format!("dish {dish_id} does not exist"))
                .with_details(json!({ "code": "dish_not_found" }))
        }
        DishStoreError::CommentMissing { comment_id, .. } => {
            Error::not_found(format!("comment {comment_id} does not exist"))
                .with_details(json!({ "code": "comment_not_found" }))
        }
        DishStoreError::DuplicateName { name } => {
            Error::conflict(format!("a dish named '{name}' already exists"))
                .with_details(json!({ "code": "duplicate_dish_name" }))
        }
        DishStoreError::Storage { message } => {
            Error::internal(format!("dish store error: {message}"))
        }
    }
}

fn map_identity_error(error: CredentialStoreError) -> Error {
    Error::internal(format!("credential store error: {error}"))
}

/// Hydrate one comment's author reference into a public profile.
pub(crate) async fn hydrate_comment(
    identities: &dyn CredentialStore,
    comment: Comment,
) -> Result<CommentView, Error> {
    let author = identities
        .find_by_id(&comment.author)
        .await
        .map_err(map_identity_error)?;
    Ok(CommentView {
        id: comment.id,
        rating: comment.rating,
        text: comment.text,
        author: author.map(|identity| identity.profile()),
        created_at: comment.created_at,
        updated_at: comment.updated_at,
    })
}

/// Hydrate a freshly re-read dish into its client-visible view.
pub(crate) async fn hydrate_dish(
    identities: &dyn CredentialStore,
    dish: Dish,
) -> Result<DishView, Error> {
    let mut comments = Vec::with_capacity(dish.comments.len());
    for comment in dish.comments {
        comments.push(hydrate_comment(identities, comment).await?);
    }
    Ok(DishView {
        id: dish.id,
        name: dish.name,
        description: dish.description,
        image: dish.image,
        category: dish.category,
        label: dish.label,
        price_cents: dish.price_cents,
        featured: dish.featured,
        comments,
        created_at: dish.created_at,
        updated_at: dish.updated_at,
    })
}

/// Dish catalogue service.
pub struct DishCatalogueService {
    dishes: Arc<dyn DishStore>,
    identities: Arc<dyn CredentialStore>,
    clock: Arc<dyn Clock>,
}

impl DishCatalogueService {
    /// Assemble the service from its collaborators.
    pub fn new(
        dishes: Arc<dyn DishStore>,
        identities: Arc<dyn CredentialStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            dishes,
            identities,
            clock,
        }
    }

    fn map_validation(error: super::dish::DishValidationError) -> Error {
        Error::invalid_request(error.to_string())
    }

    /// All dishes, hydrated.
    pub async fn list(&self) -> Result<Vec<DishView>, Error> {
        let dishes = self.dishes.list().await.map_err(map_dish_store_error)?;
        let mut views = Vec::with_capacity(dishes.len());
        for dish in dishes {
            views.push(hydrate_dish(self.identities.as_ref(), dish).await?);
        }
        Ok(views)
    }

    /// One dish, hydrated.
    pub async fn get(&self, dish_id: &DishId) -> Result<DishView, Error> {
        let dish = self
            .dishes
            .find(dish_id)
            .await
            .map_err(map_dish_store_error)?
            .ok_or_else(|| {
                Error::not_found(format!("dish {dish_id} does not exist"))
                    .with_details(json!({ "code": "dish_not_found" }))
            })?;
        hydrate_dish(self.identities.as_ref(), dish).await
    }

    /// Create a dish from a validated draft.
    pub async fn create(&self, draft: DishDraft) -> Result<DishView, Error> {
        draft.validate().map_err(Self::map_validation)?;
        let now = self.clock.utc();
        let dish = Dish {
            id: DishId::random(),
            name: draft.name,
            description: draft.description,
            image: draft.image,
            category: draft.category,
            label: draft.label,
            price_cents: draft.price_cents,
            featured: draft.featured,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        let stored = self
            .dishes
            .insert(dish)
            .await
            .map_err(map_dish_store_error)?;
        hydrate_dish(self.identities.as_ref(), stored).await
    }

    /// Apply a partial update to a dish.
    pub async fn update(&self, dish_id: &DishId, patch: DishPatch) -> Result<DishView, Error> {
        patch.validate().map_err(Self::map_validation)?;
        let updated = self
            .dishes
            .update(dish_id, patch)
            .await
            .map_err(map_dish_store_error)?;
        hydrate_dish(self.identities.as_ref(), updated).await
    }

    /// Delete one dish.
    pub async fn delete(&self, dish_id: &DishId) -> Result<(), Error> {
        self.dishes
            .remove(dish_id)
            .await
            .map_err(map_dish_store_error)
    }

    /// Delete every dish.
    pub async fn clear(&self) -> Result<(), Error> {
        self.dishes.clear().await.map_err(map_dish_store_error)
    }
}
