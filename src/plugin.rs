//! Plugin entry point — routes chat events to the notification handlers.

use std::sync::Arc;

use tracing::debug;

use crate::config::{BotConfig, NotifyConfig};
use crate::error::Result;
use crate::identifier::Identifier;
use crate::mailer::Mailer;
use crate::notify::{self, Reply, Trigger};
use crate::store::KeyValueStore;

/// An incoming chat event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A line of text from `nick` sent to `target` (a channel or the bot).
    Message {
        nick: String,
        target: String,
        text: String,
    },
    /// `nick` joined `channel`.
    Join { nick: String, channel: String },
}

/// A command recognised by the plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    SetEmail(Option<&'a str>),
    Notify,
}

/// Parse `text` as a command if it starts with `prefix`.
pub fn parse_command<'a>(prefix: &str, text: &'a str) -> Option<Command<'a>> {
    let line = text.trim().strip_prefix(prefix)?;
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };
    let arg = (!rest.is_empty()).then_some(rest);

    match name.to_ascii_lowercase().as_str() {
        "set_email" => Some(Command::SetEmail(arg)),
        "notify" => Some(Command::Notify),
        _ => None,
    }
}

/// The join-notify plugin with its collaborators.
pub struct NotifyPlugin {
    config: NotifyConfig,
    store: Arc<dyn KeyValueStore>,
    mailer: Arc<dyn Mailer>,
    bot_nick: Identifier,
    command_prefix: String,
}

impl NotifyPlugin {
    pub fn new(
        config: NotifyConfig,
        store: Arc<dyn KeyValueStore>,
        mailer: Arc<dyn Mailer>,
        bot: &BotConfig,
    ) -> Self {
        Self {
            config,
            store,
            mailer,
            bot_nick: Identifier::new(bot.nick.as_str()),
            command_prefix: bot.command_prefix.clone(),
        }
    }

    pub fn bot_nick(&self) -> &Identifier {
        &self.bot_nick
    }

    /// Handle one event, returning the text to say back, if any.
    pub async fn handle(&self, event: &Event) -> Result<Option<Reply>> {
        match event {
            Event::Message { nick, target, text } => {
                let Some(command) = parse_command(&self.command_prefix, text) else {
                    return Ok(None);
                };
                let target = Identifier::new(target.as_str());
                let sender = if target.is_channel() {
                    target
                } else {
                    Identifier::new(nick.as_str())
                };
                let trigger = Trigger::new(nick.as_str(), sender);
                self.dispatch(command, &trigger).await
            }
            Event::Join { nick, channel } => {
                let trigger = Trigger::new(nick.as_str(), channel.as_str());
                let outcome = notify::notify_on_join(
                    &self.config,
                    self.store.as_ref(),
                    self.mailer.as_ref(),
                    &self.bot_nick,
                    &trigger,
                )
                .await?;
                debug!(nick = %nick, channel = %channel, ?outcome, "Join handled");
                Ok(None)
            }
        }
    }

    async fn dispatch(&self, command: Command<'_>, trigger: &Trigger) -> Result<Option<Reply>> {
        let store = self.store.as_ref();
        let reply = match command {
            // Private-message only; silently ignored in channels.
            Command::SetEmail(_) if !trigger.is_private() => return Ok(None),
            Command::SetEmail(None) => Reply::SetEmailUsage,
            Command::SetEmail(Some(address)) => {
                notify::set_email(&self.config, store, trigger, address).await?
            }
            Command::Notify => notify::add_notify(&self.config, store, trigger).await?,
        };
        Ok(Some(reply))
    }
}
