//! Outbound email — SMTP via lettre.
//!
//! One connection per message: EHLO, STARTTLS, AUTH, send, QUIT. No pooling
//! and no retries; failures come back as [`NotifyError`] for the caller to log.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::{Message, SmtpTransport, Transport};

use crate::config::SmtpAccount;
use crate::error::NotifyError;

/// A rendered notification, ready to hand to a [`Mailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl OutgoingEmail {
    /// The `To` header value: every recipient, comma separated.
    pub fn to_header(&self) -> String {
        self.to.join(", ")
    }

    /// Build the single-part `text/plain` message.
    pub fn to_message(&self) -> Result<Message, NotifyError> {
        let from: Mailbox = parse_mailbox("from", &self.from)?;
        let mut builder = Message::builder()
            .from(from)
            .subject(self.subject.as_str())
            .header(ContentType::TEXT_PLAIN);
        for address in &self.to {
            builder = builder.to(parse_mailbox("to", address)?);
        }
        builder
            .body(self.body.clone())
            .map_err(|e| NotifyError::Build(e.to_string()))
    }
}

fn parse_mailbox(field: &'static str, address: &str) -> Result<Mailbox, NotifyError> {
    address.parse().map_err(|e: lettre::address::AddressError| {
        NotifyError::InvalidAddress {
            field,
            address: address.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Delivers a notification using the given account.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(
        &self,
        account: SmtpAccount<'_>,
        email: &OutgoingEmail,
    ) -> Result<(), NotifyError>;
}

/// SMTP submission with a STARTTLS upgrade and PLAIN/LOGIN auth.
#[derive(Debug, Default, Clone, Copy)]
pub struct SmtpMailer;

impl SmtpMailer {
    pub fn new() -> Self {
        Self
    }

    fn transport(account: SmtpAccount<'_>) -> Result<SmtpTransport, NotifyError> {
        let creds = Credentials::new(account.address.to_string(), account.password.to_string());

        Ok(SmtpTransport::starttls_relay(account.host)
            .map_err(|e| NotifyError::Connect {
                host: account.host.to_string(),
                port: account.port,
                reason: format!("TLS setup failed: {e}"),
            })?
            .port(account.port)
            .credentials(creds)
            .authentication(vec![Mechanism::Plain, Mechanism::Login])
            .build())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(
        &self,
        account: SmtpAccount<'_>,
        email: &OutgoingEmail,
    ) -> Result<(), NotifyError> {
        let message = email.to_message()?;
        let transport = Self::transport(account)?;

        // lettre's SmtpTransport blocks for the whole session.
        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| NotifyError::SendFailed(format!("SMTP task aborted: {e}")))?
            .map_err(|e| NotifyError::SendFailed(e.to_string()))?;

        tracing::info!(to = %email.to_header(), "Email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(to: &[&str]) -> OutgoingEmail {
        OutgoingEmail {
            from: "bot@example.com".into(),
            to: to.iter().map(|s| s.to_string()).collect(),
            subject: "Bot - alice joined #general".into(),
            body: "alice joined #general".into(),
        }
    }

    #[test]
    fn to_header_joins_with_comma() {
        let email = email(&["bob@example.com", "carol@example.org"]);
        assert_eq!(email.to_header(), "bob@example.com, carol@example.org");
    }

    #[test]
    fn message_carries_headers_and_body() {
        let message = email(&["bob@example.com", "carol@example.org"])
            .to_message()
            .unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("From: bot@example.com"));
        assert!(formatted.contains("bob@example.com"));
        assert!(formatted.contains("carol@example.org"));
        assert!(formatted.contains("Subject: Bot - alice joined #general"));
        assert!(formatted.contains("Content-Type: text/plain"));
        assert!(formatted.contains("alice joined #general"));

        let envelope = message.envelope();
        assert_eq!(envelope.to().len(), 2);
        assert_eq!(
            envelope.from().map(|a| a.to_string()).as_deref(),
            Some("bot@example.com")
        );
    }

    #[test]
    fn empty_recipient_is_rejected() {
        let err = email(&["bob@example.com", ""]).to_message().unwrap_err();
        assert!(matches!(err, NotifyError::InvalidAddress { field: "to", .. }));
    }

    #[test]
    fn bad_sender_is_rejected() {
        let mut email = email(&["bob@example.com"]);
        email.from = "not an address".into();
        let err = email.to_message().unwrap_err();
        assert!(matches!(err, NotifyError::InvalidAddress { field: "from", .. }));
    }
}
