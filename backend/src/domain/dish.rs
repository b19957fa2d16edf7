//! Dishes and their embedded comment collection.
//!
//! A dish owns an ordered list of comments. A comment's author reference is
//! set exactly once, at creation, from the authenticated caller — never from
//! a client-submitted body. Comments are removed individually; a bulk clear
//! empties the list but leaves the dish in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::identity::{IdentityId, PublicProfile};

/// Stable identifier for a [`Dish`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct DishId(Uuid);

impl DishId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for DishId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DishId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Stable identifier for a [`Comment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct CommentId(Uuid);

impl CommentId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for CommentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CommentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A star rating between 1 and 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

/// Error raised for ratings outside the 1–5 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rating must be between 1 and 5")]
pub struct RatingOutOfRange;

impl Rating {
    /// Validate a raw rating value.
    pub fn new(value: u8) -> Result<Self, RatingOutOfRange> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingOutOfRange)
        }
    }

    /// The raw star count.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

/// One comment embedded in a dish.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// Stable identifier within the dish's comment list.
    pub id: CommentId,
    /// Star rating.
    pub rating: Rating,
    /// Free-text body.
    pub text: String,
    /// Author reference, stamped from the authenticated caller at creation.
    pub author: IdentityId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A catalogue dish with its embedded comment list.
#[derive(Debug, Clone, PartialEq)]
pub struct Dish {
    /// Stable identifier.
    pub id: DishId,
    /// Unique display name.
    pub name: String,
    /// Menu description.
    pub description: String,
    /// Image path served by the static-file collaborator.
    pub image: String,
    /// Menu category.
    pub category: String,
    /// Optional promotional label.
    pub label: String,
    /// Price in minor currency units.
    pub price_cents: i64,
    /// Whether the dish is featured on the landing surface.
    pub featured: bool,
    /// Ordered comment list.
    pub comments: Vec<Comment>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Dish {
    /// Look up a comment by id.
    pub fn find_comment(&self, id: &CommentId) -> Option<&Comment> {
        self.comments.iter().find(|comment| comment.id == *id)
    }
}

/// Validation failures for dish drafts and patches.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DishValidationError {
    /// A required text field was blank.
    #[error("{field} must not be empty")]
    EmptyField {
        /// The offending field name.
        field: &'static str,
    },
    /// Price was negative.
    #[error("price must not be negative")]
    NegativePrice,
}

/// Input for creating a dish.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DishDraft {
    /// Unique display name.
    pub name: String,
    /// Menu description.
    pub description: String,
    /// Image path.
    pub image: String,
    /// Menu category.
    pub category: String,
    /// Optional promotional label.
    #[serde(default)]
    pub label: String,
    /// Price in minor currency units.
    pub price_cents: i64,
    /// Whether the dish is featured.
    #[serde(default)]
    pub featured: bool,
}

impl DishDraft {
    /// Validate required fields and ranges.
    pub fn validate(&self) -> Result<(), DishValidationError> {
        for (field, value) in [
            ("name", &self.name),
            ("description", &self.description),
            ("image", &self.image),
            ("category", &self.category),
        ] {
            if value.trim().is_empty() {
                return Err(DishValidationError::EmptyField { field });
            }
        }
        if self.price_cents < 0 {
            return Err(DishValidationError::NegativePrice);
        }
        Ok(())
    }
}

/// Partial update for a dish; only present fields are applied.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DishPatch {
    /// New display name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New image path.
    pub image: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New promotional label.
    pub label: Option<String>,
    /// New price in minor currency units.
    pub price_cents: Option<i64>,
    /// New featured flag.
    pub featured: Option<bool>,
}

impl DishPatch {
    /// Validate the fields that are present.
    pub fn validate(&self) -> Result<(), DishValidationError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(DishValidationError::EmptyField { field: "name" });
            }
        }
        if matches!(self.price_cents, Some(price) if price < 0) {
            return Err(DishValidationError::NegativePrice);
        }
        Ok(())
    }
}

/// Input for posting a comment.
///
/// There is deliberately no author field; the author is stamped from the
/// authenticated caller, and any author value a client smuggles into the
/// body is ignored by deserialisation.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CommentDraft {
    /// Star rating.
    pub rating: Rating,
    /// Free-text body.
    #[serde(rename = "comment")]
    pub text: String,
}

/// Partial update for a comment; only present fields are applied.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CommentPatch {
    /// New star rating.
    pub rating: Option<Rating>,
    /// New free-text body.
    #[serde(rename = "comment")]
    pub text: Option<String>,
}

/// Client-visible projection of a [`Comment`] with a hydrated author.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    /// Stable identifier.
    pub id: CommentId,
    /// Star rating.
    pub rating: Rating,
    /// Free-text body.
    #[serde(rename = "comment")]
    pub text: String,
    /// Hydrated author profile; absent only if the identity record cannot
    /// be read back.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<PublicProfile>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Client-visible projection of a [`Dish`] with hydrated comment authors.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DishView {
    /// Stable identifier.
    pub id: DishId,
    /// Unique display name.
    pub name: String,
    /// Menu description.
    pub description: String,
    /// Image path.
    pub image: String,
    /// Menu category.
    pub category: String,
    /// Promotional label.
    pub label: String,
    /// Price in minor currency units.
    pub price_cents: i64,
    /// Whether the dish is featured.
    pub featured: bool,
    /// Hydrated comment list.
    pub comments: Vec<CommentView>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Compact projection of a [`Dish`] without its comment list.
///
/// Used where dishes are embedded inside another resource, such as a
/// hydrated favourites record.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DishSummary {
    /// Stable identifier.
    pub id: DishId,
    /// Unique display name.
    pub name: String,
    /// Menu description.
    pub description: String,
    /// Image path.
    pub image: String,
    /// Menu category.
    pub category: String,
    /// Promotional label.
    pub label: String,
    /// Price in minor currency units.
    pub price_cents: i64,
    /// Whether the dish is featured.
    pub featured: bool,
}

impl From<&Dish> for DishSummary {
    fn from(dish: &Dish) -> Self {
        Self {
            id: dish.id,
            name: dish.name.clone(),
            description: dish.description.clone(),
            image: dish.image.clone(),
            category: dish.category.clone(),
            label: dish.label.clone(),
            price_cents: dish.price_cents,
            featured: dish.featured,
        }
    }
}
