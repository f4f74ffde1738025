//! IRC identifiers (nicks and channel names) with RFC 1459 case mapping.
//!
//! `Alice` and `alice` are the same nick, and so are `[bot]` and `{bot}`.
//! Store keys and subscriber-list membership both go through
//! [`Identifier::casefold`] so registrations survive nick case changes.

use std::fmt;

/// Characters that start a channel name.
const CHANNEL_PREFIXES: [char; 4] = ['#', '&', '+', '!'];

/// Convert a single character to IRC lowercase.
#[inline]
const fn irc_lower_char(c: char) -> char {
    match c {
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        '~' => '^',
        'A'..='Z' => (c as u8 + 32) as char,
        _ => c,
    }
}

/// A nick or channel name as seen on the wire.
///
/// Keeps the original spelling for display; equality is case-insensitive.
#[derive(Debug, Clone, Eq)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as it was received.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The RFC 1459 lowercase form, used as the storage key.
    pub fn casefold(&self) -> String {
        self.0.chars().map(irc_lower_char).collect()
    }

    /// Whether this names a channel rather than a nick.
    pub fn is_channel(&self) -> bool {
        self.0.starts_with(CHANNEL_PREFIXES)
    }

    /// Case-insensitive comparison against a raw string.
    pub fn matches(&self, other: &str) -> bool {
        self.0.len() == other.len()
            && self
                .0
                .chars()
                .zip(other.chars())
                .all(|(a, b)| irc_lower_char(a) == irc_lower_char(b))
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Identifier {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn casefold_maps_rfc1459_specials() {
        assert_eq!(Identifier::new("HELLO").casefold(), "hello");
        assert_eq!(Identifier::new("#Channel[1]").casefold(), "#channel{1}");
        assert_eq!(Identifier::new("Nick\\Away").casefold(), "nick|away");
        assert_eq!(Identifier::new("Test~Name").casefold(), "test^name");
    }

    #[test]
    fn equality_ignores_case() {
        assert_eq!(Identifier::new("Alice"), Identifier::new("alice"));
        assert_eq!(Identifier::new("[bot]"), Identifier::new("{BOT}"));
        assert_ne!(Identifier::new("alice"), Identifier::new("alice_"));
    }

    #[test]
    fn display_keeps_original_spelling() {
        assert_eq!(Identifier::new("Alice").to_string(), "Alice");
    }

    #[test]
    fn channel_detection() {
        assert!(Identifier::new("#general").is_channel());
        assert!(Identifier::new("&local").is_channel());
        assert!(!Identifier::new("alice").is_channel());
        assert!(!Identifier::new("").is_channel());
    }
}
