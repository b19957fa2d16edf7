//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only
//! depend on the domain services, which in turn talk to ports; handler
//! tests swap in memory-backed adapters without any I/O.

use std::sync::Arc;

use crate::domain::{AccountService, CommentService, DishCatalogueService, FavoritesService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Signup, login, sessions, tokens, and OAuth exchange.
    pub accounts: Arc<AccountService>,
    /// Dish catalogue CRUD.
    pub catalogue: Arc<DishCatalogueService>,
    /// Comment operations scoped to a dish.
    pub comments: Arc<CommentService>,
    /// Favourites operations scoped to the caller.
    pub favorites: Arc<FavoritesService>,
}

impl HttpState {
    /// Bundle the four services.
    pub fn new(
        accounts: Arc<AccountService>,
        catalogue: Arc<DishCatalogueService>,
        comments: Arc<CommentService>,
        favorites: Arc<FavoritesService>,
    ) -> Self {
        Self {
            accounts,
            catalogue,
            comments,
            favorites,
        }
    }
}
