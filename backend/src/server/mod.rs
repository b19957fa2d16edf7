//! Server assembly: state construction and route mounting.
//!
//! Everything here is also used by the integration tests, which compose the
//! same state and routes over a test session middleware.

pub mod config;

use std::sync::Arc;

use actix_web::web;
use chrono::Utc;
use mockable::{Clock, DefaultClock};
use tracing::{error, info, warn};

use crate::domain::identity::{Identity, IdentityId};
use crate::domain::ports::{CredentialStore, DishStore, FixtureIdentityProvider, IdentityProvider};
use crate::domain::{
    password, AccountService, CommentService, Dish, DishCatalogueService, DishId,
    FavoritesService, TokenIssuer,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{comments, dishes, favorites, users};
use crate::outbound::persistence::{
    MemoryCredentialStore, MemoryDishStore, MemoryFavoritesStore, MemorySessionStore,
};
use crate::outbound::provider::HttpIdentityProvider;

pub use config::{AppConfig, ConfigError};

/// Build the HTTP state over fresh adapters, seeding example data when the
/// configuration asks for it.
pub async fn build_state(config: &AppConfig) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let identities = Arc::new(MemoryCredentialStore::new());
    let sessions = Arc::new(MemorySessionStore::new());
    let dish_store = Arc::new(MemoryDishStore::new(clock.clone()));
    let favorites_store = Arc::new(MemoryFavoritesStore::new(clock.clone()));

    let provider: Arc<dyn IdentityProvider> = match &config.provider_profile_url {
        Some(url) => match HttpIdentityProvider::new(url.clone()) {
            Ok(adapter) => Arc::new(adapter),
            Err(err) => {
                error!(error = %err, "failed to build identity provider client; exchanges will be rejected");
                Arc::new(FixtureIdentityProvider::default())
            }
        },
        None => {
            warn!("no OAuth profile endpoint configured; exchanges will be rejected");
            Arc::new(FixtureIdentityProvider::default())
        }
    };

    if config.seed_example_data {
        seed_example_data(identities.as_ref(), dish_store.as_ref()).await;
    }

    let tokens = TokenIssuer::new(
        &config.token_secret,
        config.token_ttl_seconds,
        clock.clone(),
    );
    let accounts = Arc::new(AccountService::new(
        identities.clone(),
        sessions,
        provider,
        tokens,
        config.session_ttl_seconds,
        clock.clone(),
    ));
    let catalogue = Arc::new(DishCatalogueService::new(
        dish_store.clone(),
        identities.clone(),
        clock.clone(),
    ));
    let comment_service = Arc::new(CommentService::new(
        dish_store.clone(),
        identities.clone(),
        clock,
    ));
    let favorites_service = Arc::new(FavoritesService::new(favorites_store, dish_store));
    HttpState::new(accounts, catalogue, comment_service, favorites_service)
}

/// Mount every route scope onto the application.
pub fn mount_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .service(users::signup)
            .service(users::login)
            .service(users::logout)
            .service(users::check_token)
            .service(users::oauth_callback),
    );
    cfg.service(
        web::scope("/dishes")
            .service(comments::list_comments)
            .service(comments::add_comment)
            .service(comments::delete_all_comments)
            .service(comments::get_comment)
            .service(comments::update_comment)
            .service(comments::delete_comment)
            .service(dishes::list_dishes)
            .service(dishes::create_dish)
            .service(dishes::put_dishes_unsupported)
            .service(dishes::delete_all_dishes)
            .service(dishes::get_dish)
            .service(dishes::post_dish_unsupported)
            .service(dishes::update_dish)
            .service(dishes::delete_dish),
    );
    cfg.service(
        web::scope("/favorites")
            .service(favorites::get_favorites)
            .service(favorites::add_favorites_batch)
            .service(favorites::put_favorites_unsupported)
            .service(favorites::clear_favorites)
            .service(favorites::probe_favorite)
            .service(favorites::add_favorite)
            .service(favorites::remove_favorite),
    );
}

/// Seed an administrator and a couple of dishes for local runs.
async fn seed_example_data(identities: &dyn CredentialStore, dish_store: &dyn DishStore) {
    let admin_credential = match password::hash_password("password") {
        Ok(hash) => hash,
        Err(err) => {
            error!(error = %err, "failed to hash seed credential; skipping example data");
            return;
        }
    };
    let admin = Identity {
        id: IdentityId::random(),
        username: "admin".to_owned(),
        credential: Some(admin_credential),
        first_name: Some("Ada".to_owned()),
        last_name: Some("Lovelace".to_owned()),
        is_admin: true,
        external_id: None,
        created_at: Utc::now(),
    };
    if let Err(err) = identities.insert(admin).await {
        warn!(error = %err, "seed administrator not inserted");
    }

    let now = Utc::now();
    let seeds = [
        ("Uthappizza", "A unique combination of Indian Uthappam and Italian pizza.", 499),
        ("Zucchipakoda", "Deep fried Zucchini coated with mildly spiced Chickpea flour batter.", 199),
    ];
    for (name, description, price_cents) in seeds {
        let dish = Dish {
            id: DishId::random(),
            name: name.to_owned(),
            description: description.to_owned(),
            image: format!("images/{}.png", name.to_ascii_lowercase()),
            category: "mains".to_owned(),
            label: String::new(),
            price_cents,
            featured: false,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        if let Err(err) = dish_store.insert(dish).await {
            warn!(error = %err, "seed dish not inserted");
        }
    }
    info!("seeded example data");
}
