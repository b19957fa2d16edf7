//! Driven port for server-side session records.

use async_trait::async_trait;

use crate::domain::session::{SessionId, SessionRecord};

/// Failures surfaced by a session store implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionStoreError {
    /// The backing store failed.
    #[error("session store failure: {message}")]
    Storage {
        /// Store-reported description, for logs only.
        message: String,
    },
}

impl SessionStoreError {
    /// Construct a [`SessionStoreError::Storage`] value.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Persists session records keyed by their opaque id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a new session record.
    async fn insert(&self, record: SessionRecord) -> Result<(), SessionStoreError>;

    /// Look up a session record; expiry is the caller's policy.
    async fn find(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionStoreError>;

    /// Destroy a session record. Destroying an absent record is not an
    /// error at this layer.
    async fn remove(&self, id: &SessionId) -> Result<(), SessionStoreError>;
}
