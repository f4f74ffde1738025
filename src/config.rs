//! Configuration types.

use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};

use crate::error::ConfigError;
use crate::template;

pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_EMAIL_SUBJECT: &str = "{bot_nick} - {nick} joined {channel}";
pub const DEFAULT_EMAIL_BODY: &str = "{nick} joined {channel}";

/// A user-editable setting and the prompt shown when configuring it.
#[derive(Debug, Clone, Copy)]
pub struct Setting {
    pub key: &'static str,
    pub env_var: &'static str,
    pub prompt: &'static str,
}

const SETTINGS: &[Setting] = &[
    Setting {
        key: "email_address",
        env_var: "NOTIFY_EMAIL_ADDRESS",
        prompt: "The from-address the bot will use when notifying each user:",
    },
    Setting {
        key: "password",
        env_var: "NOTIFY_PASSWORD",
        prompt: "The password to use when logging in to the SMTP server:",
    },
    Setting {
        key: "smtp_host",
        env_var: "NOTIFY_SMTP_HOST",
        prompt: "The domain name of or ip of the SMTP server:",
    },
    Setting {
        key: "smtp_port",
        env_var: "NOTIFY_SMTP_PORT",
        prompt: "The port of the SMTP server (default 587):",
    },
    Setting {
        key: "email_subject",
        env_var: "NOTIFY_EMAIL_SUBJECT",
        prompt: "The subject of the email (bot_nick, nick, and channel are available as format string keys):",
    },
    Setting {
        key: "email_body",
        env_var: "NOTIFY_EMAIL_BODY",
        prompt: "The body of the email (bot_nick, nick, and channel are available as format string keys):",
    },
];

/// The `[notify]` section: SMTP account and message templates.
///
/// Loaded once at startup and handed to every handler by reference.
#[derive(Debug)]
pub struct NotifyConfig {
    /// Sender address, also the SMTP login.
    pub email_address: Option<String>,
    pub password: Option<SecretString>,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    /// Subject format string.
    pub email_subject: String,
    /// Body format string.
    pub email_body: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            email_address: None,
            password: None,
            smtp_host: None,
            smtp_port: Some(DEFAULT_SMTP_PORT),
            email_subject: DEFAULT_EMAIL_SUBJECT.to_string(),
            email_body: DEFAULT_EMAIL_BODY.to_string(),
        }
    }
}

impl NotifyConfig {
    /// Build config from `NOTIFY_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let smtp_port = match get("NOTIFY_SMTP_PORT") {
            Some(raw) => Some(raw.trim().parse::<u16>().map_err(|e| {
                ConfigError::InvalidValue {
                    key: "smtp_port".into(),
                    message: format!("{raw:?} is not a port number: {e}"),
                }
            })?),
            None => defaults.smtp_port,
        };

        let email_subject = get("NOTIFY_EMAIL_SUBJECT").unwrap_or(defaults.email_subject);
        let email_body = get("NOTIFY_EMAIL_BODY").unwrap_or(defaults.email_body);
        for (key, value) in [("email_subject", &email_subject), ("email_body", &email_body)] {
            template::check(value).map_err(|e| ConfigError::InvalidValue {
                key: key.into(),
                message: e.to_string(),
            })?;
        }

        Ok(Self {
            email_address: get("NOTIFY_EMAIL_ADDRESS"),
            password: get("NOTIFY_PASSWORD").map(SecretString::from),
            smtp_host: get("NOTIFY_SMTP_HOST"),
            smtp_port,
            email_subject,
            email_body,
        })
    }

    /// True when everything needed to log in and send is present.
    pub fn is_configured(&self) -> bool {
        self.email_address.is_some()
            && self.password.is_some()
            && self.smtp_host.is_some()
            && self.smtp_port.is_some()
    }

    /// The SMTP account, if the section is complete.
    pub fn smtp_account(&self) -> Option<SmtpAccount<'_>> {
        Some(SmtpAccount {
            address: self.email_address.as_deref()?,
            password: self.password.as_ref()?.expose_secret(),
            host: self.smtp_host.as_deref()?,
            port: self.smtp_port?,
        })
    }

    /// Every user-editable key with its configuration prompt.
    pub fn settings() -> &'static [Setting] {
        SETTINGS
    }
}

/// Borrowed view of a complete SMTP account.
#[derive(Clone, Copy)]
pub struct SmtpAccount<'a> {
    pub address: &'a str,
    pub password: &'a str,
    pub host: &'a str,
    pub port: u16,
}

/// Settings for the host bot around the plugin.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// The bot's own nick; joins by this nick never notify.
    pub nick: String,
    /// Prefix that marks a chat line as a command.
    pub command_prefix: String,
    /// Location of the key-value database.
    pub db_path: PathBuf,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            nick: "notifybot".to_string(),
            command_prefix: ".".to_string(),
            db_path: PathBuf::from("./data/join-notify.db"),
        }
    }
}

impl BotConfig {
    /// Build config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let get = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            nick: get("NOTIFY_BOT_NICK").unwrap_or(defaults.nick),
            command_prefix: get("NOTIFY_COMMAND_PREFIX").unwrap_or(defaults.command_prefix),
            db_path: get("NOTIFY_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
        }
    }
}
