//! Line-oriented event input for running the plugin from a terminal.
//!
//! ```text
//! JOIN <nick> <channel>
//! <nick> <target> <text...>
//! ```

use crate::plugin::Event;

/// Help text shown for malformed lines.
pub const USAGE: &str = "expected `JOIN <nick> <channel>` or `<nick> <target> <text>`";

/// Parse one input line. Blank lines and `#` comments give `None`.
pub fn parse_line(line: &str) -> Option<Result<Event, &'static str>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with("# ") || line == "#" {
        return None;
    }

    let mut parts = line.splitn(3, char::is_whitespace);
    let first = parts.next().unwrap_or_default();
    let second = parts.next().map(str::trim).filter(|s| !s.is_empty());
    let third = parts.next().map(str::trim).filter(|s| !s.is_empty());

    let event = match (first, second, third) {
        (cmd, Some(nick), Some(channel)) if cmd.eq_ignore_ascii_case("JOIN") => Event::Join {
            nick: nick.to_string(),
            channel: channel.to_string(),
        },
        (nick, Some(target), Some(text)) => Event::Message {
            nick: nick.to_string(),
            target: target.to_string(),
            text: text.to_string(),
        },
        _ => return Some(Err(USAGE)),
    };
    Some(Ok(event))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_join() {
        assert_eq!(
            parse_line("JOIN alice #general"),
            Some(Ok(Event::Join {
                nick: "alice".into(),
                channel: "#general".into()
            }))
        );
    }

    #[test]
    fn parses_message_with_spaces() {
        assert_eq!(
            parse_line("alice notifybot .set_email a@example.com"),
            Some(Ok(Event::Message {
                nick: "alice".into(),
                target: "notifybot".into(),
                text: ".set_email a@example.com".into()
            }))
        );
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        assert_eq!(parse_line("   "), None);
        assert_eq!(parse_line("# setup"), None);
    }

    #[test]
    fn channel_names_are_not_comments() {
        assert!(matches!(parse_line("#general"), Some(Err(_))));
    }

    #[test]
    fn rejects_short_lines() {
        assert_eq!(parse_line("JOIN alice"), Some(Err(USAGE)));
        assert_eq!(parse_line("alice #general"), Some(Err(USAGE)));
    }
}
