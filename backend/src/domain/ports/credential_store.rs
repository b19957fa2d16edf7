//! Driven port for identity persistence and credential verification.

use async_trait::async_trait;

use crate::domain::identity::{Identity, IdentityId};

/// Failures surfaced by a credential store implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialStoreError {
    /// The unique-name invariant would be violated.
    #[error("username '{username}' is already taken")]
    DuplicateUsername {
        /// The contested name.
        username: String,
    },
    /// The unique external-provider-id invariant would be violated.
    #[error("external id '{external_id}' is already bound to an identity")]
    DuplicateExternalId {
        /// The contested external id.
        external_id: String,
    },
    /// The backing store failed.
    #[error("credential store failure: {message}")]
    Storage {
        /// Store-reported description, for logs only.
        message: String,
    },
}

impl CredentialStoreError {
    /// Construct a [`CredentialStoreError::Storage`] value.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Why a credential check did not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoMatchReason {
    /// No identity is registered under the presented username.
    UnknownIdentity,
    /// The identity exists but carries no local credential (provisioned via
    /// the OAuth exchange) and cannot authenticate locally.
    MissingCredential,
    /// The presented password does not verify against the stored material.
    BadCredential,
}

/// Tagged outcome of a credential check; hard store errors travel separately.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialCheck {
    /// The credentials verified; here is the identity.
    Match(Identity),
    /// The credentials did not verify.
    NoMatch(NoMatchReason),
}

/// Persists identity records and verifies hashed credentials.
///
/// The password comparison is the store's primitive so the constant-time
/// guarantee lives with the credential material, not with every caller.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up an identity by stable id.
    async fn find_by_id(&self, id: &IdentityId)
        -> Result<Option<Identity>, CredentialStoreError>;

    /// Look up an identity by unique name.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Identity>, CredentialStoreError>;

    /// Look up an identity by external-provider id.
    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Identity>, CredentialStoreError>;

    /// Persist a new identity, enforcing the uniqueness invariants.
    async fn insert(&self, identity: Identity) -> Result<Identity, CredentialStoreError>;

    /// Verify a presented password for `username`.
    async fn verify_password(
        &self,
        username: &str,
        candidate: &str,
    ) -> Result<CredentialCheck, CredentialStoreError>;
}
