//! Typed JSON collections stored under a single key.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{EngineError, EngineResult};

use super::KeyValueStore;

/// Key holding time entries.
pub const TIME_ENTRIES_KEY: &str = "time_entries";
/// Key holding employees.
pub const EMPLOYEES_KEY: &str = "employees";
/// Key holding contracts.
pub const CONTRACTS_KEY: &str = "contracts";
/// Key holding clients.
pub const CLIENTS_KEY: &str = "clients";
/// Key holding finalized invoices.
pub const INVOICES_KEY: &str = "invoices";

/// A whole collection of `T` persisted as one JSON array.
pub struct JsonCollection<T> {
    store: Arc<dyn KeyValueStore>,
    key: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonCollection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: self.key,
            _marker: PhantomData,
        }
    }
}

impl<T: Serialize + DeserializeOwned> JsonCollection<T> {
    /// Binds a collection to `key` in `store`.
    pub fn new(store: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self {
            store,
            key,
            _marker: PhantomData,
        }
    }

    /// Returns the key the collection lives under.
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Loads every item; a missing key is an empty collection.
    pub async fn load(&self) -> EngineResult<Vec<T>> {
        match self.store.get(self.key).await? {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|e| EngineError::Serialization {
                key: self.key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Encodes `items` into a `(key, value)` pair without writing it.
    pub fn encode(&self, items: &[T]) -> EngineResult<(String, String)> {
        let raw = serde_json::to_string(items).map_err(|e| EngineError::Serialization {
            key: self.key.to_string(),
            message: e.to_string(),
        })?;
        Ok((self.key.to_string(), raw))
    }

    /// Replaces the stored collection with `items`.
    pub async fn save(&self, items: &[T]) -> EngineResult<()> {
        let (key, raw) = self.encode(items)?;
        self.store.set(&key, raw).await
    }
}
