//! `set_email` and `notify` command handlers.

use tracing::info;

use crate::config::NotifyConfig;
use crate::error::DatabaseError;
use crate::notify::{Reply, Trigger};
use crate::store::KeyValueStore;
use crate::store::subscribers;
use crate::validate::is_deliverable_email;

/// Associate an email address with the issuing nick.
///
/// Private-message only; the router enforces that before calling here.
pub async fn set_email(
    config: &NotifyConfig,
    store: &dyn KeyValueStore,
    trigger: &Trigger,
    address: &str,
) -> Result<Reply, DatabaseError> {
    if !config.is_configured() {
        return Ok(Reply::NotConfigured);
    }
    if !is_deliverable_email(address) {
        return Ok(Reply::InvalidEmail {
            input: address.to_string(),
        });
    }

    subscribers::set_nick_email(store, &trigger.nick, address).await?;
    info!(nick = %trigger.nick, "Registered notification email");

    Ok(Reply::EmailAssociated {
        email: address.to_string(),
        nick: trigger.nick.to_string(),
    })
}

/// Subscribe the issuing nick to joins in the current channel.
pub async fn add_notify(
    config: &NotifyConfig,
    store: &dyn KeyValueStore,
    trigger: &Trigger,
) -> Result<Reply, DatabaseError> {
    if !config.is_configured() {
        return Ok(Reply::NotConfigured);
    }
    if trigger.is_private() {
        return Ok(Reply::ChannelOnly);
    }
    if subscribers::nick_email(store, &trigger.nick).await?.is_none() {
        return Ok(Reply::EmailRequired);
    }

    let channel = &trigger.sender;
    let mut nicks = subscribers::notification_list(store, channel).await?;
    if nicks.iter().any(|n| trigger.nick.matches(n)) {
        return Ok(Reply::AlreadySubscribed);
    }

    nicks.push(trigger.nick.to_string());
    subscribers::set_notification_list(store, channel, &nicks).await?;
    info!(nick = %trigger.nick, channel = %channel, "Subscribed to join notifications");

    Ok(Reply::Subscribed {
        nick: trigger.nick.to_string(),
    })
}
