//! Subscriber lists and registered addresses on top of a `KeyValueStore`.

use serde_json::Value;

use crate::error::DatabaseError;
use crate::identifier::Identifier;
use crate::store::traits::{KeyValueStore, Scope};

/// Channel-scoped key holding the list of nicks to notify.
pub const CHANNEL_NOTIFY_KEY: &str = "notify_nicks";
/// Nick-scoped key holding the registered email address.
pub const NICK_EMAIL_KEY: &str = "notify_email";

/// Nicks subscribed to joins in `channel`; empty if none were ever stored.
pub async fn notification_list(
    store: &dyn KeyValueStore,
    channel: &Identifier,
) -> Result<Vec<String>, DatabaseError> {
    match store.get(Scope::Channel(channel), CHANNEL_NOTIFY_KEY).await? {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value).map_err(|e| {
            DatabaseError::Serialization(format!("{CHANNEL_NOTIFY_KEY} for {channel}: {e}"))
        }),
    }
}

/// Replace the subscriber list for `channel`.
pub async fn set_notification_list(
    store: &dyn KeyValueStore,
    channel: &Identifier,
    nicks: &[String],
) -> Result<(), DatabaseError> {
    let value = Value::from(nicks.to_vec());
    store
        .set(Scope::Channel(channel), CHANNEL_NOTIFY_KEY, &value)
        .await
}

/// The address registered for `nick`, if any.
pub async fn nick_email(
    store: &dyn KeyValueStore,
    nick: &Identifier,
) -> Result<Option<String>, DatabaseError> {
    match store.get(Scope::Nick(nick), NICK_EMAIL_KEY).await? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(email)) => Ok(Some(email)),
        Some(other) => Err(DatabaseError::Serialization(format!(
            "{NICK_EMAIL_KEY} for {nick} is not a string: {other}"
        ))),
    }
}

/// Register `email` for `nick`, replacing any earlier address.
pub async fn set_nick_email(
    store: &dyn KeyValueStore,
    nick: &Identifier,
    email: &str,
) -> Result<(), DatabaseError> {
    store
        .set(Scope::Nick(nick), NICK_EMAIL_KEY, &Value::from(email))
        .await
}
