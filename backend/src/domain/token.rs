//! Signed, self-contained bearer tokens.
//!
//! A token embeds the identity reference plus issued-at/expiry timestamps and
//! is valid only until its embedded expiry and only under the current signing
//! key. Nothing is persisted; revocation is not supported short of rotating
//! the key. Verification is pure computation and never suspends.
//!
//! Expiry is checked against the injected [`Clock`] rather than the signature
//! library's ambient system time, so the TTL behaviour is testable.

use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::identity::IdentityId;
use super::Error;

/// Fixed token lifetime applied at issuance.
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 3600;

/// Claims embedded in a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Identity the token was issued to.
    pub sub: Uuid,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch (`iat` + fixed TTL).
    pub exp: i64,
}

impl AccessClaims {
    /// Identity reference carried by the token.
    pub fn identity_id(&self) -> IdentityId {
        IdentityId::from(self.sub)
    }
}

/// Failures while verifying a presented token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Structure or signature is invalid.
    #[error("token is malformed or its signature does not verify")]
    Malformed,
    /// The embedded expiry has passed.
    #[error("token has expired")]
    Expired,
}

/// Mints and validates signed bearer tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_seconds: i64,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    /// Build an issuer over a shared-secret signing key.
    pub fn new(secret: &[u8], ttl_seconds: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_seconds: i64::try_from(ttl_seconds).unwrap_or(i64::MAX),
            clock,
        }
    }

    /// Mint a token for the given identity, expiring a fixed interval from
    /// now.
    pub fn issue(&self, identity: &IdentityId) -> Result<String, Error> {
        let now = self.clock.utc().timestamp();
        let claims = AccessClaims {
            sub: identity.as_uuid(),
            iat: now,
            exp: now.saturating_add(self.ttl_seconds),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| Error::internal(format!("failed to sign token: {err}")))
    }

    /// Validate structure, signature, and expiry of a presented token.
    ///
    /// Resolving the embedded identity against the credential store is the
    /// caller's concern; this check never touches state.
    pub fn verify(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is compared against the injected clock below.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        let data = decode::<AccessClaims>(token, &self.decoding, &validation)
            .map_err(|_| TokenError::Malformed)?;
        if self.clock.utc().timestamp() > data.claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(data.claims)
    }
}
