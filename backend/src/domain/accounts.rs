//! Account and authentication use-cases.
//!
//! One service owns every identity-resolution path: local credential
//! verification (body or Basic header), server-side sessions, bearer token
//! issuance/resolution, and the external OAuth exchange. Port failures are
//! translated into the domain taxonomy here; nothing above this layer sees a
//! store- or provider-native error.

use std::sync::Arc;

use chrono::Duration;
use mockable::Clock;
use serde_json::json;

use super::auth::{parse_basic_header, LoginCredentials};
use super::identity::{Identity, IdentityId, SignupDraft};
use super::password;
use super::ports::{
    CredentialCheck, CredentialStore, CredentialStoreError, IdentityProvider,
    IdentityProviderError, NoMatchReason, SessionStore, SessionStoreError,
};
use super::session::{SessionId, SessionRecord};
use super::token::{TokenError, TokenIssuer};
use super::Error;

/// Orchestrates signup, login, sessions, bearer tokens, and OAuth exchange.
pub struct AccountService {
    identities: Arc<dyn CredentialStore>,
    sessions: Arc<dyn SessionStore>,
    provider: Arc<dyn IdentityProvider>,
    tokens: TokenIssuer,
    session_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl AccountService {
    /// Assemble the service from its collaborators.
    pub fn new(
        identities: Arc<dyn CredentialStore>,
        sessions: Arc<dyn SessionStore>,
        provider: Arc<dyn IdentityProvider>,
        tokens: TokenIssuer,
        session_ttl_seconds: u64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            identities,
            sessions,
            provider,
            tokens,
            session_ttl: Duration::seconds(i64::try_from(session_ttl_seconds).unwrap_or(i64::MAX)),
            clock,
        }
    }

    fn map_store_error(error: CredentialStoreError) -> Error {
        match error {
            CredentialStoreError::DuplicateUsername { username } => {
                Error::conflict(format!("user '{username}' already exists"))
                    .with_details(json!({ "code": "duplicate_username" }))
            }
            CredentialStoreError::DuplicateExternalId { .. } => {
                Error::conflict("this external account is already bound to an identity")
                    .with_details(json!({ "code": "duplicate_external_id" }))
            }
            CredentialStoreError::Storage { message } => {
                Error::internal(format!("credential store error: {message}"))
            }
        }
    }

    fn map_session_error(error: SessionStoreError) -> Error {
        match error {
            SessionStoreError::Storage { message } => {
                Error::internal(format!("session store error: {message}"))
            }
        }
    }

    /// Register a new local identity.
    pub async fn signup(&self, draft: SignupDraft) -> Result<Identity, Error> {
        let credential = password::hash_password(draft.password())?;
        let identity = Identity {
            id: IdentityId::random(),
            username: draft.username().to_owned(),
            credential: Some(credential),
            first_name: draft.first_name().map(str::to_owned),
            last_name: draft.last_name().map(str::to_owned),
            is_admin: false,
            external_id: None,
            created_at: self.clock.utc(),
        };
        self.identities
            .insert(identity)
            .await
            .map_err(Self::map_store_error)
    }

    /// Verify an `Authorization: Basic` header value.
    ///
    /// Every failure path carries the Basic challenge marker so the HTTP
    /// adapter re-challenges the client.
    pub async fn verify_basic(&self, header: Option<&str>) -> Result<Identity, Error> {
        let Some(value) = header else {
            return Err(Self::malformed_basic());
        };
        let credentials = parse_basic_header(value).map_err(|_| Self::malformed_basic())?;
        self.verify_credentials(&credentials)
            .await
            .map_err(Error::with_basic_challenge)
    }

    fn malformed_basic() -> Error {
        Error::unauthorized("credentials are missing or malformed")
            .with_details(json!({ "code": "missing_or_malformed_credentials" }))
            .with_basic_challenge()
    }

    /// Verify a username/password pair against the credential store.
    pub async fn verify_credentials(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Identity, Error> {
        let check = self
            .identities
            .verify_password(credentials.username(), credentials.password())
            .await
            .map_err(Self::map_store_error)?;
        match check {
            CredentialCheck::Match(identity) => Ok(identity),
            CredentialCheck::NoMatch(NoMatchReason::UnknownIdentity) => Err(Error::unauthorized(
                format!("user '{}' does not exist", credentials.username()),
            )
            .with_details(json!({ "code": "unknown_identity" }))),
            // An account without local credential material answers exactly
            // like a wrong password; do not reveal how it was provisioned.
            CredentialCheck::NoMatch(
                NoMatchReason::MissingCredential | NoMatchReason::BadCredential,
            ) => Err(Error::unauthorized("your password is incorrect")
                .with_details(json!({ "code": "bad_credential" }))),
        }
    }

    /// Open a server-side session for an authenticated identity.
    pub async fn begin_session(&self, identity: &Identity) -> Result<SessionId, Error> {
        let record = SessionRecord::begin(identity.id, self.clock.utc(), self.session_ttl);
        let id = record.id;
        self.sessions
            .insert(record)
            .await
            .map_err(Self::map_session_error)?;
        Ok(id)
    }

    /// Resolve a session id to its identity.
    ///
    /// Expired or unknown sessions resolve to `None`; an expired record is
    /// destroyed on the way out. Callers fail closed on `None`.
    pub async fn resolve_session(&self, id: &SessionId) -> Result<Option<Identity>, Error> {
        let Some(record) = self
            .sessions
            .find(id)
            .await
            .map_err(Self::map_session_error)?
        else {
            return Ok(None);
        };
        if record.is_expired_at(self.clock.utc()) {
            self.sessions
                .remove(id)
                .await
                .map_err(Self::map_session_error)?;
            return Ok(None);
        }
        self.identities
            .find_by_id(&record.identity)
            .await
            .map_err(Self::map_store_error)
    }

    /// Destroy a session record; destroying an absent record is a no-op.
    pub async fn end_session(&self, id: &SessionId) -> Result<(), Error> {
        self.sessions
            .remove(id)
            .await
            .map_err(Self::map_session_error)
    }

    /// Mint a bearer token for an identity.
    pub fn issue_token(&self, identity: &IdentityId) -> Result<String, Error> {
        self.tokens.issue(identity)
    }

    /// Resolve a presented bearer token to its identity.
    pub async fn resolve_bearer(&self, token: &str) -> Result<Identity, Error> {
        let claims = self.tokens.verify(token).map_err(|err| match err {
            TokenError::Malformed => Error::unauthorized("token is malformed")
                .with_details(json!({ "code": "token_malformed" })),
            TokenError::Expired => Error::unauthorized("token has expired")
                .with_details(json!({ "code": "token_expired" })),
        })?;
        self.identities
            .find_by_id(&claims.identity_id())
            .await
            .map_err(Self::map_store_error)?
            .ok_or_else(|| {
                Error::unauthorized("the identity behind this token no longer exists")
                    .with_details(json!({ "code": "identity_gone" }))
            })
    }

    /// Exchange a provider access token for a local identity.
    ///
    /// A previously seen external id resolves to the existing identity with
    /// no profile overwrite. An unseen one provisions a new identity bound
    /// to the external id, with no local credential. No session or token is
    /// issued here; the route layer does that afterwards.
    pub async fn oauth_exchange(&self, access_token: &str) -> Result<Identity, Error> {
        let profile = self
            .provider
            .fetch_profile(access_token)
            .await
            .map_err(|err| match err {
                IdentityProviderError::Denied => {
                    Error::unauthorized("the identity provider rejected the access token")
                        .with_details(json!({ "code": "provider_denied" }))
                }
                IdentityProviderError::Unreachable { message }
                | IdentityProviderError::MalformedProfile { message } => {
                    tracing::error!(error = %message, "identity provider exchange failed");
                    Error::unauthorized("the identity provider could not be reached")
                        .with_details(json!({ "code": "provider_unreachable" }))
                }
            })?;

        if let Some(existing) = self
            .identities
            .find_by_external_id(&profile.external_id)
            .await
            .map_err(Self::map_store_error)?
        {
            return Ok(existing);
        }

        let identity = Identity {
            id: IdentityId::random(),
            username: profile.display_name,
            credential: None,
            first_name: profile.given_name,
            last_name: profile.family_name,
            is_admin: false,
            external_id: Some(profile.external_id.clone()),
            created_at: self.clock.utc(),
        };
        match self.identities.insert(identity).await {
            Ok(provisioned) => Ok(provisioned),
            // Lost a provisioning race; the winner's record is authoritative.
            Err(CredentialStoreError::DuplicateExternalId { external_id }) => self
                .identities
                .find_by_external_id(&external_id)
                .await
                .map_err(Self::map_store_error)?
                .ok_or_else(|| Error::internal("provisioned identity vanished mid-exchange")),
            Err(other) => Err(Self::map_store_error(other)),
        }
    }
}
