//! In-memory session store adapter.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{SessionStore, SessionStoreError};
use crate::domain::session::{SessionId, SessionRecord};

/// Session records keyed by their opaque id.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    records: RwLock<HashMap<SessionId, SessionRecord>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(&self, record: SessionRecord) -> Result<(), SessionStoreError> {
        self.records.write().await.insert(record.id, record);
        Ok(())
    }

    async fn find(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionStoreError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn remove(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        self.records.write().await.remove(id);
        Ok(())
    }
}
