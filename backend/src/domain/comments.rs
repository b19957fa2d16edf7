//! Comment use-cases, scoped to a dish.
//!
//! The author reference is stamped from the authenticated caller at creation
//! and is immutable afterwards. Update and delete are strictly author-only:
//! the admin role deliberately does not bypass comment ownership, in
//! contrast to dish-level admin operations. The bulk clear is the one
//! admin-gated comment operation and that gate is applied at the route
//! layer.

use std::sync::Arc;

use mockable::Clock;
use serde_json::json;

use super::auth::require_owner;
use super::dish::{Comment, CommentDraft, CommentId, CommentPatch, CommentView, DishId, DishView};
use super::dishes::{hydrate_comment, hydrate_dish, map_dish_store_error};
use super::identity::Identity;
use super::ports::{CredentialStore, DishStore};
use super::Error;

/// Comment service over the dish store.
pub struct CommentService {
    dishes: Arc<dyn DishStore>,
    identities: Arc<dyn CredentialStore>,
    clock: Arc<dyn Clock>,
}

impl CommentService {
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

    fn dish_not_found(dish_id: &DishId) -> Error {
        Error::not_found(format!("dish {dish_id} does not exist"))
            .with_details(json!({ "code": "dish_not_found" }))
    }

    fn comment_not_found(comment_id: &CommentId) -> Error {
        Error::not_found(format!("comment {comment_id} does not exist"))
            .with_details(json!({ "code": "comment_not_found" }))
    }

    async fn dish_or_not_found(&self, dish_id: &DishId) -> Result<super::dish::Dish, Error> {
        self.dishes
            .find(dish_id)
            .await
            .map_err(map_dish_store_error)?
            .ok_or_else(|| Self::dish_not_found(dish_id))
    }

    /// All comments on a dish, hydrated, in list order.
    pub async fn list(&self, dish_id: &DishId) -> Result<Vec<CommentView>, Error> {
        let dish = self.dish_or_not_found(dish_id).await?;
        let mut views = Vec::with_capacity(dish.comments.len());
        for comment in dish.comments {
            views.push(hydrate_comment(self.identities.as_ref(), comment).await?);
        }
        Ok(views)
    }

    /// One comment, hydrated.
    pub async fn get(&self, dish_id: &DishId, comment_id: &CommentId) -> Result<CommentView, Error> {
        let dish = self.dish_or_not_found(dish_id).await?;
        let comment = dish
            .find_comment(comment_id)
            .cloned()
            .ok_or_else(|| Self::comment_not_found(comment_id))?;
        hydrate_comment(self.identities.as_ref(), comment).await
    }

    /// Append a comment authored by the caller, then return the re-read,
    /// hydrated dish.
    ///
    /// Any author value in the submitted body was already discarded during
    /// deserialisation; the reference set here is the only one that exists.
    pub async fn add(
        &self,
        dish_id: &DishId,
        author: &Identity,
        draft: CommentDraft,
    ) -> Result<DishView, Error> {
        let now = self.clock.utc();
        let comment = Comment {
            id: CommentId::random(),
            rating: draft.rating,
            text: draft.text,
            author: author.id,
            created_at: now,
            updated_at: now,
        };
        let dish = self
            .dishes
            .append_comment(dish_id, comment)
            .await
            .map_err(map_dish_store_error)?;
        hydrate_dish(self.identities.as_ref(), dish).await
    }

    /// Apply a partial update to the requester's own comment.
    pub async fn update(
        &self,
        dish_id: &DishId,
        comment_id: &CommentId,
        requester: &Identity,
        patch: CommentPatch,
    ) -> Result<DishView, Error> {
        let dish = self.dish_or_not_found(dish_id).await?;
        let comment = dish
            .find_comment(comment_id)
            .ok_or_else(|| Self::comment_not_found(comment_id))?;
        require_owner(requester, &comment.author)?;
        let updated = self
            .dishes
            .update_comment(dish_id, comment_id, patch)
            .await
            .map_err(map_dish_store_error)?;
        hydrate_dish(self.identities.as_ref(), updated).await
    }

    /// Remove exactly the requester's own comment from the ordered list.
    pub async fn delete(
        &self,
        dish_id: &DishId,
        comment_id: &CommentId,
        requester: &Identity,
    ) -> Result<DishView, Error> {
        let dish = self.dish_or_not_found(dish_id).await?;
        let comment = dish
            .find_comment(comment_id)
            .ok_or_else(|| Self::comment_not_found(comment_id))?;
        require_owner(requester, &comment.author)?;
        let updated = self
            .dishes
            .remove_comment(dish_id, comment_id)
            .await
            .map_err(map_dish_store_error)?;
        hydrate_dish(self.identities.as_ref(), updated).await
    }

    /// Empty a dish's comment list. Admin gating happens at the route layer.
    pub async fn delete_all(&self, dish_id: &DishId) -> Result<DishView, Error> {
        let cleared = self
            .dishes
            .clear_comments(dish_id)
            .await
            .map_err(map_dish_store_error)?;
        hydrate_dish(self.identities.as_ref(), cleared).await
    }
}

#[cfg(test)]
mod tests;
