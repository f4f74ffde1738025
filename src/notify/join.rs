//! Join-event dispatcher: email every subscriber of the channel.

use tracing::{debug, error, info};

use crate::config::NotifyConfig;
use crate::error::{DatabaseError, NotifyError};
use crate::identifier::Identifier;
use crate::mailer::{Mailer, OutgoingEmail};
use crate::notify::Trigger;
use crate::store::KeyValueStore;
use crate::store::subscribers;
use crate::template::{self, TemplateVars};

/// How a join event was handled. Delivery failures are already logged.
#[derive(Debug)]
pub enum JoinOutcome {
    /// Notification settings are incomplete.
    NotConfigured,
    /// The bot itself joined.
    OwnJoin,
    /// Nobody other than the joiner is subscribed.
    NoSubscribers,
    /// One email went out to this many recipients.
    Sent { recipients: usize },
    /// Building or delivering the email failed.
    Failed(NotifyError),
}

/// Handle a JOIN of `join.nick` into `join.sender`.
///
/// Store errors propagate; anything that goes wrong while building or
/// sending the email is logged and reported as [`JoinOutcome::Failed`].
pub async fn notify_on_join(
    config: &NotifyConfig,
    store: &dyn KeyValueStore,
    mailer: &dyn Mailer,
    bot_nick: &Identifier,
    join: &Trigger,
) -> Result<JoinOutcome, DatabaseError> {
    let Some(account) = config.smtp_account() else {
        return Ok(JoinOutcome::NotConfigured);
    };
    if join.nick == *bot_nick {
        return Ok(JoinOutcome::OwnJoin);
    }

    let channel = &join.sender;
    let mut nicks = subscribers::notification_list(store, channel).await?;
    // Subscribers are not told about their own joins.
    nicks.retain(|n| !join.nick.matches(n));
    if nicks.is_empty() {
        debug!(nick = %join.nick, channel = %channel, "No one to notify");
        return Ok(JoinOutcome::NoSubscribers);
    }

    let mut to_addresses = Vec::with_capacity(nicks.len());
    for nick in &nicks {
        let email = subscribers::nick_email(store, &Identifier::new(nick.as_str())).await?;
        to_addresses.push((nick.as_str(), email));
    }

    let email = match build_email(config, account.address, bot_nick, join, to_addresses) {
        Ok(email) => email,
        Err(e) => {
            error!(
                error = %e,
                nick = %join.nick,
                channel = %channel,
                "Failed when trying to build email"
            );
            return Ok(JoinOutcome::Failed(e));
        }
    };

    match mailer.send(account, &email).await {
        Ok(()) => {
            info!(
                nick = %join.nick,
                channel = %channel,
                recipients = email.to.len(),
                "Join notification sent"
            );
            Ok(JoinOutcome::Sent {
                recipients: email.to.len(),
            })
        }
        Err(e) => {
            error!(
                error = %e,
                details = ?e,
                host = account.host,
                port = account.port,
                nick = %join.nick,
                channel = %channel,
                "Failed when trying to send email"
            );
            Ok(JoinOutcome::Failed(e))
        }
    }
}

fn build_email(
    config: &NotifyConfig,
    from: &str,
    bot_nick: &Identifier,
    join: &Trigger,
    to_addresses: Vec<(&str, Option<String>)>,
) -> Result<OutgoingEmail, NotifyError> {
    let to = to_addresses
        .into_iter()
        .map(|(nick, email)| {
            email.ok_or_else(|| NotifyError::MissingRecipient {
                nick: nick.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let vars = TemplateVars {
        bot_nick: bot_nick.as_str(),
        nick: join.nick.as_str(),
        channel: join.sender.as_str(),
    };
    let render = |template: &str| {
        template::render(template, &vars).map_err(|e| NotifyError::Build(e.to_string()))
    };

    Ok(OutgoingEmail {
        from: from.to_string(),
        to,
        subject: render(&config.email_subject)?,
        body: render(&config.email_body)?,
    })
}
