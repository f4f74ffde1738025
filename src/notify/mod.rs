//! Join notifications: address registration, channel subscription and
//! the join-event dispatcher.

pub mod commands;
pub mod join;

use std::fmt;

use crate::identifier::Identifier;

pub use commands::{add_notify, set_email};
pub use join::{JoinOutcome, notify_on_join};

/// Who issued a command or event, and where.
#[derive(Debug, Clone)]
pub struct Trigger {
    /// The acting user.
    pub nick: Identifier,
    /// The channel, or the peer nick for a private message.
    pub sender: Identifier,
}

impl Trigger {
    pub fn new(nick: impl Into<Identifier>, sender: impl Into<Identifier>) -> Self {
        Self {
            nick: nick.into(),
            sender: sender.into(),
        }
    }

    /// True when the trigger came from a private message, not a channel.
    pub fn is_private(&self) -> bool {
        !self.sender.is_channel()
    }
}

/// What a command handler says back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    NotConfigured,
    EmailAssociated { email: String, nick: String },
    InvalidEmail { input: String },
    SetEmailUsage,
    ChannelOnly,
    EmailRequired,
    Subscribed { nick: String },
    AlreadySubscribed,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::NotConfigured => f.write_str("not configured"),
            Reply::EmailAssociated { email, nick } => {
                write!(f, "\"{email}\" associated with \"{nick}\"")
            }
            Reply::InvalidEmail { input } => {
                write!(f, "\"{input}\" doesn't look like a valid email address")
            }
            Reply::SetEmailUsage => f.write_str("usage: .set_email anonymous@example.com"),
            Reply::ChannelOnly => f.write_str(
                "run this command in a channel to be notified when a user joins the channel",
            ),
            Reply::EmailRequired => f.write_str(
                "you have not configured your email, you can do so by sending \
                 .set_email <email> in a private message to me",
            ),
            Reply::Subscribed { nick } => {
                write!(f, "{nick}: I'll notify you when users join this channel")
            }
            Reply::AlreadySubscribed => f.write_str("you're already on the notification list"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_vs_channel_trigger() {
        assert!(Trigger::new("alice", "alice").is_private());
        assert!(!Trigger::new("alice", "#general").is_private());
    }

    #[test]
    fn reply_texts() {
        assert_eq!(Reply::NotConfigured.to_string(), "not configured");
        assert_eq!(
            Reply::EmailAssociated {
                email: "a@example.com".into(),
                nick: "alice".into()
            }
            .to_string(),
            "\"a@example.com\" associated with \"alice\""
        );
        assert_eq!(
            Reply::InvalidEmail {
                input: "nope".into()
            }
            .to_string(),
            "\"nope\" doesn't look like a valid email address"
        );
        assert_eq!(
            Reply::EmailRequired.to_string(),
            "you have not configured your email, you can do so by sending \
             .set_email <email> in a private message to me"
        );
        assert_eq!(
            Reply::Subscribed {
                nick: "alice".into()
            }
            .to_string(),
            "alice: I'll notify you when users join this channel"
        );
    }
}
