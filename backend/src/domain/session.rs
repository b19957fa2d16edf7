//! Server-side session records.
//!
//! The client only ever holds the opaque [`SessionId`] inside a cookie; the
//! record itself, including its expiry, lives in the session store. Resolving
//! an expired or unknown id yields nothing and callers fail closed.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::identity::IdentityId;

/// Default server-side session lifetime.
pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 86_400;

/// Opaque capability pointer stored in the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a fresh random session identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// One authenticated session, bound to an identity with a hard expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// Opaque identifier handed to the client.
    pub id: SessionId,
    /// Identity this session authenticates.
    pub identity: IdentityId,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Instant after which the session no longer resolves.
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Open a new session for `identity` starting at `now`.
    pub fn begin(identity: IdentityId, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            id: SessionId::random(),
            identity,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Whether the session has expired as of `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
