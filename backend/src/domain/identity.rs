//! Identity records and profile projections.
//!
//! An [`Identity`] is a registered account. It is created on signup or on
//! first successful OAuth exchange and never deleted by this core. Hashed
//! credential material is opaque here; see [`crate::domain::password`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use zeroize::Zeroizing;

use super::password::CredentialHash;

/// Stable identifier for an [`Identity`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct IdentityId(Uuid);

impl IdentityId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Expose the raw UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for IdentityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for IdentityId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl From<Uuid> for IdentityId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// A registered account record.
///
/// ## Invariants
/// - `username` is unique across all identities (enforced by the credential
///   store).
/// - `external_id`, when present, is unique (enforced by the credential
///   store).
/// - Identities provisioned through the OAuth exchange carry no local
///   credential and stay locked out of Basic/local authentication.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    /// Stable identifier; ownership checks compare this value.
    pub id: IdentityId,
    /// Unique login name.
    pub username: String,
    /// Hashed credential material; `None` for provider-provisioned accounts.
    pub credential: Option<CredentialHash>,
    /// Optional given name.
    pub first_name: Option<String>,
    /// Optional family name.
    pub last_name: Option<String>,
    /// Role flag consulted by the authorization gate.
    pub is_admin: bool,
    /// External-provider subject this identity is bound to, if any.
    pub external_id: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Project the identity into its client-visible form.
    pub fn profile(&self) -> PublicProfile {
        PublicProfile {
            id: self.id,
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            is_admin: self.is_admin,
        }
    }
}

/// Client-visible projection of an [`Identity`].
///
/// Never carries credential material or the external-provider binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    /// Stable identifier.
    pub id: IdentityId,
    /// Unique login name.
    pub username: String,
    /// Optional given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Optional family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Role flag.
    pub is_admin: bool,
}

/// Profile returned by the external identity provider for an access token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExternalProfile {
    /// Provider-scoped subject identifier.
    pub external_id: String,
    /// Display name used as the local unique name on provisioning.
    pub display_name: String,
    /// Optional given name.
    pub given_name: Option<String>,
    /// Optional family name.
    pub family_name: Option<String>,
}

/// Validation failures for a signup draft.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignupValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated input for creating a local identity.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty and retains caller-provided whitespace.
#[derive(Debug, Clone)]
pub struct SignupDraft {
    username: String,
    password: Zeroizing<String>,
    first_name: Option<String>,
    last_name: Option<String>,
}

impl SignupDraft {
    /// Construct a draft from raw signup inputs.
    pub fn try_from_parts(
        username: &str,
        password: &str,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Result<Self, SignupValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(SignupValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(SignupValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
            first_name,
            last_name,
        })
    }

    /// Username for the new identity.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Raw password to be hashed before storage.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Optional given name.
    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    /// Optional family name.
    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", SignupValidationError::EmptyUsername)]
    #[case("   ", "pw", SignupValidationError::EmptyUsername)]
    #[case("alice", "", SignupValidationError::EmptyPassword)]
    fn invalid_signup_drafts(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: SignupValidationError,
    ) {
        let err = SignupDraft::try_from_parts(username, password, None, None)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn signup_draft_trims_username_only() {
        let draft = SignupDraft::try_from_parts("  alice  ", " secret ", None, None)
            .expect("valid inputs should succeed");
        assert_eq!(draft.username(), "alice");
        assert_eq!(draft.password(), " secret ");
    }

    #[test]
    fn profile_omits_credential_material() {
        let identity = Identity {
            id: IdentityId::random(),
            username: "alice".to_owned(),
            credential: None,
            first_name: Some("Alice".to_owned()),
            last_name: None,
            is_admin: false,
            external_id: None,
            created_at: chrono::Utc::now(),
        };
        let profile = identity.profile();
        assert_eq!(profile.username, "alice");
        let json = serde_json::to_value(&profile).expect("serialise profile");
        assert!(json.get("credential").is_none());
        assert!(json.get("externalId").is_none());
    }
}
