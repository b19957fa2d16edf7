//! In-memory credential store adapter.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::identity::{Identity, IdentityId};
use crate::domain::password;
use crate::domain::ports::{
    CredentialCheck, CredentialStore, CredentialStoreError, NoMatchReason,
};

/// Identity records guarded by one collection-wide lock.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    records: RwLock<Vec<Identity>>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored identities.
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_id(
        &self,
        id: &IdentityId,
    ) -> Result<Option<Identity>, CredentialStoreError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|record| record.id == *id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Identity>, CredentialStoreError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|record| record.username == username)
            .cloned())
    }

    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Identity>, CredentialStoreError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|record| record.external_id.as_deref() == Some(external_id))
            .cloned())
    }

    async fn insert(&self, identity: Identity) -> Result<Identity, CredentialStoreError> {
        let mut records = self.records.write().await;
        if records
            .iter()
            .any(|record| record.username == identity.username)
        {
            return Err(CredentialStoreError::DuplicateUsername {
                username: identity.username,
            });
        }
        if let Some(external_id) = &identity.external_id {
            if records
                .iter()
                .any(|record| record.external_id.as_deref() == Some(external_id.as_str()))
            {
                return Err(CredentialStoreError::DuplicateExternalId {
                    external_id: external_id.clone(),
                });
            }
        }
        records.push(identity.clone());
        Ok(identity)
    }

    async fn verify_password(
        &self,
        username: &str,
        candidate: &str,
    ) -> Result<CredentialCheck, CredentialStoreError> {
        let identity = {
            let records = self.records.read().await;
            records.iter().find(|record| record.username == username).cloned()
        };
        let Some(identity) = identity else {
            return Ok(CredentialCheck::NoMatch(NoMatchReason::UnknownIdentity));
        };
        let Some(hash) = &identity.credential else {
            return Ok(CredentialCheck::NoMatch(NoMatchReason::MissingCredential));
        };
        if password::verify_password(hash, candidate) {
            Ok(CredentialCheck::Match(identity))
        } else {
            Ok(CredentialCheck::NoMatch(NoMatchReason::BadCredential))
        }
    }
}
