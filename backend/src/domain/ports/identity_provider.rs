//! Driven port for the external OAuth identity provider.

use async_trait::async_trait;

use crate::domain::identity::ExternalProfile;

/// Failures surfaced by an identity provider adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityProviderError {
    /// The provider could not be reached or answered with a server fault.
    #[error("identity provider unreachable: {message}")]
    Unreachable {
        /// Transport-level description, for logs only.
        message: String,
    },
    /// The provider rejected the presented access token.
    #[error("identity provider rejected the access token")]
    Denied,
    /// The provider's response could not be decoded.
    #[error("identity provider returned an undecodable profile: {message}")]
    MalformedProfile {
        /// Decoder description, for logs only.
        message: String,
    },
}

impl IdentityProviderError {
    /// Construct an [`IdentityProviderError::Unreachable`] value.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable {
            message: message.into(),
        }
    }

    /// Construct an [`IdentityProviderError::MalformedProfile`] value.
    pub fn malformed_profile(message: impl Into<String>) -> Self {
        Self::MalformedProfile {
            message: message.into(),
        }
    }
}

/// Exchanges a provider access token for the verified external profile.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Fetch the profile the provider associates with `access_token`.
    async fn fetch_profile(
        &self,
        access_token: &str,
    ) -> Result<ExternalProfile, IdentityProviderError>;
}

/// In-memory provider used by tests and unconfigured development runs.
///
/// Unknown tokens are rejected the way a real provider would reject a
/// revoked one.
#[derive(Debug, Default)]
pub struct FixtureIdentityProvider {
    profiles: std::collections::HashMap<String, ExternalProfile>,
}

impl FixtureIdentityProvider {
    /// Register a profile the provider will return for `access_token`.
    #[must_use]
    pub fn with_profile(mut self, access_token: impl Into<String>, profile: ExternalProfile) -> Self {
        self.profiles.insert(access_token.into(), profile);
        self
    }
}

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    async fn fetch_profile(
        &self,
        access_token: &str,
    ) -> Result<ExternalProfile, IdentityProviderError> {
        self.profiles
            .get(access_token)
            .cloned()
            .ok_or(IdentityProviderError::Denied)
    }
}
