//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::Key;
use chrono::Utc;
use mockable::{Clock, DefaultClock};

use crate::domain::identity::ExternalProfile;
use crate::domain::ports::{CredentialStore, FixtureIdentityProvider};
use crate::domain::{
    password, AccountService, CommentService, DishCatalogueService, FavoritesService, Identity,
    IdentityId, TokenIssuer, DEFAULT_SESSION_TTL_SECONDS, DEFAULT_TOKEN_TTL_SECONDS,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{
    MemoryCredentialStore, MemoryDishStore, MemoryFavoritesStore, MemorySessionStore,
};

/// Access token the fixture identity provider accepts in tests.
pub const TEST_PROVIDER_TOKEN: &str = "provider-access-token";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// HTTP state plus direct handles on the backing memory adapters, so tests
/// can seed identities and dishes without going through the API.
pub struct TestHarness {
    /// Ready-to-mount handler state.
    pub state: HttpState,
    /// Identity records behind the state.
    pub identities: Arc<MemoryCredentialStore>,
    /// Dish records behind the state.
    pub dishes: Arc<MemoryDishStore>,
}

/// Build a harness over fresh memory adapters.
pub fn test_harness() -> TestHarness {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let identities = Arc::new(MemoryCredentialStore::new());
    let sessions = Arc::new(MemorySessionStore::new());
    let dishes = Arc::new(MemoryDishStore::new(clock.clone()));
    let favorites = Arc::new(MemoryFavoritesStore::new(clock.clone()));
    let provider = Arc::new(FixtureIdentityProvider::default().with_profile(
        TEST_PROVIDER_TOKEN,
        ExternalProfile {
            external_id: "ext-42".to_owned(),
            display_name: "Provider User".to_owned(),
            given_name: Some("Provider".to_owned()),
            family_name: Some("User".to_owned()),
        },
    ));
    let tokens = TokenIssuer::new(
        b"handler-test-signing-secret-32b!!!!",
        DEFAULT_TOKEN_TTL_SECONDS,
        clock.clone(),
    );
    let accounts = Arc::new(AccountService::new(
        identities.clone(),
        sessions,
        provider,
        tokens,
        DEFAULT_SESSION_TTL_SECONDS,
        clock.clone(),
    ));
    let catalogue = Arc::new(DishCatalogueService::new(
        dishes.clone(),
        identities.clone(),
        clock.clone(),
    ));
    let comments = Arc::new(CommentService::new(
        dishes.clone(),
        identities.clone(),
        clock,
    ));
    let favorites = Arc::new(FavoritesService::new(favorites, dishes.clone()));
    TestHarness {
        state: HttpState::new(accounts, catalogue, comments, favorites),
        identities,
        dishes,
    }
}

/// Build just the handler state over fresh memory adapters.
pub fn test_state() -> HttpState {
    test_harness().state
}

/// Insert an identity with a hashed password directly into the store.
pub async fn seed_identity(
    harness: &TestHarness,
    username: &str,
    raw_password: &str,
    is_admin: bool,
) -> Identity {
    let identity = Identity {
        id: IdentityId::random(),
        username: username.to_owned(),
        credential: Some(password::hash_password(raw_password).expect("hashing succeeds")),
        first_name: None,
        last_name: None,
        is_admin,
        external_id: None,
        created_at: Utc::now(),
    };
    harness
        .identities
        .insert(identity)
        .await
        .expect("identity inserts")
}
