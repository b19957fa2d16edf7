//! Per-identity favourites sets.
//!
//! One record per identity, created lazily on first add. A record with an
//! empty dish list is a valid terminal state and is distinct from the record
//! never having existed, so callers can tell "never favourited anything"
//! apart from "favourited then cleared".

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::dish::{DishId, DishSummary};
use super::identity::IdentityId;

/// A deduplicated, ordered collection of dish references for one identity.
///
/// ## Invariants
/// - A dish reference appears at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoritesSet {
    /// Identity owning the record.
    pub owner: IdentityId,
    /// Referenced dishes, in insertion order, without duplicates.
    pub dishes: Vec<DishId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl FavoritesSet {
    /// Open an empty record for `owner` at `now`.
    pub fn empty(owner: IdentityId, now: DateTime<Utc>) -> Self {
        Self {
            owner,
            dishes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `dish` is already referenced.
    pub fn contains(&self, dish: &DishId) -> bool {
        self.dishes.contains(dish)
    }
}

/// Client-visible projection of a [`FavoritesSet`] with hydrated dishes.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesView {
    /// Identity owning the record.
    pub owner: IdentityId,
    /// Hydrated dish summaries, in insertion order.
    pub dishes: Vec<DishSummary>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
}
