//! Key-value storage seam.
//!
//! The engine persists whole collections as JSON blobs under fixed keys. The
//! [`KeyValueStore`] trait is the only persistence contract it relies on.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::EngineResult;

/// An opaque string key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    async fn get(&self, key: &str) -> EngineResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> EngineResult<()>;

    /// Stores several values at once: either every value is written or none is.
    async fn set_many(&self, entries: Vec<(String, String)>) -> EngineResult<()>;
}

/// A process-local store backed by a map.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> EngineResult<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> EngineResult<()> {
        debug!(key, bytes = value.len(), "Writing key");
        self.values.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn set_many(&self, entries: Vec<(String, String)>) -> EngineResult<()> {
        let mut values = self.values.write().await;
        for (key, value) in entries {
            debug!(key = %key, bytes = value.len(), "Writing key in batch");
            values.insert(key, value);
        }
        Ok(())
    }
}
