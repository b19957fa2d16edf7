//! Domain types, ports, and use-case services.
//!
//! Everything in this module is transport agnostic. Inbound adapters parse
//! requests into these types, services consult the ports, and the error
//! taxonomy travels back out to be mapped onto HTTP at the boundary.

pub mod accounts;
pub mod auth;
pub mod comments;
pub mod dish;
pub mod dishes;
pub mod error;
pub mod favorites;
pub mod favorites_service;
pub mod identity;
pub mod password;
pub mod ports;
pub mod session;
pub mod token;

pub use self::accounts::AccountService;
pub use self::auth::{
    parse_basic_header, require_admin, require_authenticated, require_owner,
    require_owner_or_admin, BasicAuthError, LoginCredentials, LoginValidationError,
};
pub use self::comments::CommentService;
pub use self::dish::{
    Comment, CommentDraft, CommentId, CommentPatch, CommentView, Dish, DishDraft, DishId,
    DishPatch, DishSummary, DishView, Rating,
};
pub use self::dishes::DishCatalogueService;
pub use self::error::{AuthChallenge, Error, ErrorCode};
pub use self::favorites::{FavoritesSet, FavoritesView};
pub use self::favorites_service::FavoritesService;
pub use self::identity::{ExternalProfile, Identity, IdentityId, PublicProfile, SignupDraft};
pub use self::password::CredentialHash;
pub use self::session::{SessionId, SessionRecord, DEFAULT_SESSION_TTL_SECONDS};
pub use self::token::{AccessClaims, TokenError, TokenIssuer, DEFAULT_TOKEN_TTL_SECONDS};
