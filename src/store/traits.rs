//! `KeyValueStore` trait — the only persistence surface the plugin sees.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::DatabaseError;
use crate::identifier::Identifier;

/// Which namespace a key lives in.
#[derive(Debug, Clone, Copy)]
pub enum Scope<'a> {
    Channel(&'a Identifier),
    Nick(&'a Identifier),
}

impl Scope<'_> {
    /// Short label for logs and table selection.
    pub fn kind(&self) -> &'static str {
        match self {
            Scope::Channel(_) => "channel",
            Scope::Nick(_) => "nick",
        }
    }

    /// Case-folded owner name, used as the storage key.
    pub fn owner(&self) -> String {
        match self {
            Scope::Channel(id) | Scope::Nick(id) => id.casefold(),
        }
    }
}

/// Per-channel and per-nick JSON values.
///
/// Implementations are expected to be consistent for a single caller; no
/// compare-and-swap is offered, so read-modify-write sequences are not atomic.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key` for `scope`, if any.
    async fn get(&self, scope: Scope<'_>, key: &str) -> Result<Option<Value>, DatabaseError>;

    /// Store `value` under `key` for `scope`, replacing any previous value.
    async fn set(&self, scope: Scope<'_>, key: &str, value: &Value) -> Result<(), DatabaseError>;
}
