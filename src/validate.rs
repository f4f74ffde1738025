//! Email address syntax check.
//!
//! Accepts `local-part@domain` where the local part is a dot-atom or a
//! quoted string and the domain is a dotted hostname or a bracketed
//! IPv4 / tagged literal. This is a syntax check only; no DNS lookup.
//!
//! [`is_deliverable_email`] further narrows the grammar to what the SMTP
//! client can put on an envelope; registration goes through that one.

use std::sync::LazyLock;

use lettre::message::Mailbox;
use regex::Regex;

static VALID_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:",
        // dot-atom local part
        r"[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*",
        // quoted local part
        r#"|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21\x23-\x5b\x5d-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*""#,
        r")@(?:",
        // hostname
        r"(?:[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?\.)+[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?",
        // address literal
        r"|\[(?:(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])\.){3}",
        r"(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9]",
        r"|[a-zA-Z0-9-]*[a-zA-Z0-9]:(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21-\x5a\x53-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])+)\]",
        r")$",
    ))
    .expect("email pattern is valid")
});

/// Returns `true` if `candidate` is a syntactically valid email address.
pub fn is_valid_email(candidate: &str) -> bool {
    VALID_EMAIL.is_match(candidate)
}

/// Like [`is_valid_email`], but also requires that the address can be used
/// as an SMTP recipient. Address literals and quoted local parts that do
/// not reduce to a dot-atom are syntactically valid yet refused here.
pub fn is_deliverable_email(candidate: &str) -> bool {
    is_valid_email(candidate) && candidate.parse::<Mailbox>().is_ok()
}
