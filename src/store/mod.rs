//! Persistence layer — scoped key-value storage for subscriptions and addresses.

pub mod libsql_backend;
pub mod memory;
pub mod migrations;
pub mod subscribers;
pub mod traits;

pub use libsql_backend::LibSqlStore;
pub use memory::InMemoryStore;
pub use traits::{KeyValueStore, Scope};
