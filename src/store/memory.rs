//! In-process `KeyValueStore` for tests and throwaway runs.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::DatabaseError;
use crate::store::traits::{KeyValueStore, Scope};

type Key = (&'static str, String, String);

/// HashMap-backed store. Nothing survives the process.
#[derive(Default)]
pub struct InMemoryStore {
    values: Mutex<HashMap<Key, Value>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored values across all scopes.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Key, Value>> {
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn key(scope: Scope<'_>, key: &str) -> Key {
        (scope.kind(), scope.owner(), key.to_string())
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, scope: Scope<'_>, key: &str) -> Result<Option<Value>, DatabaseError> {
        Ok(self.lock().get(&Self::key(scope, key)).cloned())
    }

    async fn set(&self, scope: Scope<'_>, key: &str, value: &Value) -> Result<(), DatabaseError> {
        self.lock().insert(Self::key(scope, key), value.clone());
        Ok(())
    }
}
