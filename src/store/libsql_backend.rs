//! libSQL backend — async `KeyValueStore` implementation.
//!
//! Values are stored as JSON text in one table per scope. Supports local
//! file and in-memory databases.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use libsql::{Connection, Database as LibSqlDatabase, params};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::DatabaseError;
use crate::store::migrations;
use crate::store::traits::{KeyValueStore, Scope};

/// libSQL key-value backend.
///
/// Stores a single connection that is reused for all operations.
pub struct LibSqlStore {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlStore {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let store = Self::from_database(db)?;
        migrations::run_migrations(&store.conn).await?;
        info!(path = %path.display(), "Database opened");
        Ok(store)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        let store = Self::from_database(db)?;
        migrations::run_migrations(&store.conn).await?;
        Ok(store)
    }

    fn from_database(db: LibSqlDatabase) -> Result<Self, DatabaseError> {
        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;
        Ok(Self {
            db: Arc::new(db),
            conn,
        })
    }
}

/// Table and owner column for a scope.
fn table_for(scope: &Scope<'_>) -> (&'static str, &'static str) {
    match scope {
        Scope::Channel(_) => ("channel_values", "channel"),
        Scope::Nick(_) => ("nick_values", "nick"),
    }
}

#[async_trait]
impl KeyValueStore for LibSqlStore {
    async fn get(&self, scope: Scope<'_>, key: &str) -> Result<Option<Value>, DatabaseError> {
        let (table, column) = table_for(&scope);
        let owner = scope.owner();
        let mut rows = self
            .conn
            .query(
                &format!("SELECT value FROM {table} WHERE {column} = ?1 AND key = ?2"),
                params![owner.as_str(), key],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get {table}: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let raw: String = row
                    .get(0)
                    .map_err(|e| DatabaseError::Query(format!("get {table}: {e}")))?;
                let value = serde_json::from_str(&raw).map_err(|e| {
                    DatabaseError::Serialization(format!("{table} {owner}/{key}: {e}"))
                })?;
                Ok(Some(value))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get {table}: {e}"))),
        }
    }

    async fn set(&self, scope: Scope<'_>, key: &str, value: &Value) -> Result<(), DatabaseError> {
        let (table, column) = table_for(&scope);
        let owner = scope.owner();
        let now = Utc::now().to_rfc3339();
        let raw =
            serde_json::to_string(value).map_err(|e| DatabaseError::Serialization(e.to_string()))?;

        self.conn
            .execute(
                &format!(
                    "INSERT INTO {table} ({column}, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT ({column}, key) DO UPDATE SET value = ?3, updated_at = ?4"
                ),
                params![owner.as_str(), key, raw, now],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("set {table}: {e}")))?;

        debug!(scope = scope.kind(), owner = %owner, key, "Value stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::identifier::Identifier;

    async fn test_db() -> LibSqlStore {
        LibSqlStore::new_memory().await.unwrap()
    }

    #[tokio::test]
    async fn get_missing_is_none() {
        let db = test_db().await;
        let chan = Identifier::new("#general");
        let value = db.get(Scope::Channel(&chan), "notify_nicks").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn set_then_get_round_trips_json() {
        let db = test_db().await;
        let chan = Identifier::new("#general");
        let list = json!(["alice", "bob"]);

        db.set(Scope::Channel(&chan), "notify_nicks", &list)
            .await
            .unwrap();

        let fetched = db.get(Scope::Channel(&chan), "notify_nicks").await.unwrap();
        assert_eq!(fetched, Some(list));
    }

    #[tokio::test]
    async fn set_overwrites() {
        let db = test_db().await;
        let nick = Identifier::new("alice");

        db.set(Scope::Nick(&nick), "notify_email", &json!("a@example.com"))
            .await
            .unwrap();
        db.set(Scope::Nick(&nick), "notify_email", &json!("b@example.com"))
            .await
            .unwrap();

        let fetched = db.get(Scope::Nick(&nick), "notify_email").await.unwrap();
        assert_eq!(fetched, Some(json!("b@example.com")));
    }

    #[tokio::test]
    async fn nick_and_channel_tables_are_separate() {
        let db = test_db().await;
        let name = Identifier::new("shared");

        db.set(Scope::Nick(&name), "k", &json!("nick"))
            .await
            .unwrap();

        assert!(db.get(Scope::Channel(&name), "k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn owner_is_casefolded() {
        let db = test_db().await;

        db.set(Scope::Nick(&Identifier::new("Alice[m]")), "k", &json!(true))
            .await
            .unwrap();

        let fetched = db
            .get(Scope::Nick(&Identifier::new("alice{M}")), "k")
            .await
            .unwrap();
        assert_eq!(fetched, Some(json!(true)));
    }

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("notify.db");
        let nick = Identifier::new("alice");

        {
            let db = LibSqlStore::new_local(&path).await.unwrap();
            db.set(Scope::Nick(&nick), "notify_email", &json!("a@example.com"))
                .await
                .unwrap();
        }

        let db = LibSqlStore::new_local(&path).await.unwrap();
        let fetched = db.get(Scope::Nick(&nick), "notify_email").await.unwrap();
        assert_eq!(fetched, Some(json!("a@example.com")));
    }
}
