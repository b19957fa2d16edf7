//! Reqwest-backed identity provider adapter.
//!
//! This adapter owns transport details only: presenting the access token,
//! HTTP status mapping, and JSON decoding into the domain profile.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::domain::identity::ExternalProfile;
use crate::domain::ports::{IdentityProvider, IdentityProviderError};

const DEFAULT_PROFILE_TIMEOUT: Duration = Duration::from_secs(10);

/// Identity provider adapter performing a GET against one profile endpoint.
pub struct HttpIdentityProvider {
    client: Client,
    profile_url: Url,
}

impl HttpIdentityProvider {
    /// Build an adapter with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(profile_url: Url) -> Result<Self, reqwest::Error> {
        Self::with_timeout(profile_url, DEFAULT_PROFILE_TIMEOUT)
    }

    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_timeout(profile_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            profile_url,
        })
    }
}

/// Wire shape of the provider's profile document.
#[derive(Debug, Deserialize)]
struct ProfileDto {
    id: String,
    name: String,
    #[serde(default)]
    given_name: Option<String>,
    #[serde(default)]
    family_name: Option<String>,
}

impl From<ProfileDto> for ExternalProfile {
    fn from(dto: ProfileDto) -> Self {
        Self {
            external_id: dto.id,
            display_name: dto.name,
            given_name: dto.given_name,
            family_name: dto.family_name,
        }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn fetch_profile(
        &self,
        access_token: &str,
    ) -> Result<ExternalProfile, IdentityProviderError> {
        let response = self
            .client
            .get(self.profile_url.clone())
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| IdentityProviderError::unreachable(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(IdentityProviderError::Denied);
        }
        if !status.is_success() {
            return Err(IdentityProviderError::unreachable(format!(
                "provider answered with status {status}"
            )));
        }

        let profile: ProfileDto = response
            .json()
            .await
            .map_err(|err| IdentityProviderError::malformed_profile(err.to_string()))?;
        Ok(profile.into())
    }
}
