use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};

use join_notify::cli;
use join_notify::config::{BotConfig, NotifyConfig};
use join_notify::mailer::SmtpMailer;
use join_notify::plugin::NotifyPlugin;
use join_notify::store::{InMemoryStore, KeyValueStore, LibSqlStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help-config") {
        for setting in NotifyConfig::settings() {
            println!("{} ({})\n    {}", setting.key, setting.env_var, setting.prompt);
        }
        return Ok(());
    }
    let ephemeral = args.iter().any(|a| a == "--memory");

    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let notify_config = NotifyConfig::from_env().context("Invalid NOTIFY_* configuration")?;
    let bot_config = BotConfig::from_env();

    eprintln!("join-notify v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Bot nick: {}", bot_config.nick);
    if notify_config.is_configured() {
        eprintln!(
            "   SMTP: {}:{}",
            notify_config.smtp_host.as_deref().unwrap_or_default(),
            notify_config.smtp_port.unwrap_or_default()
        );
    } else {
        eprintln!("   SMTP: not configured (run with --help-config)");
    }

    let store: Arc<dyn KeyValueStore> = if ephemeral {
        eprintln!("   Database: in-memory");
        Arc::new(InMemoryStore::new())
    } else {
        let store = LibSqlStore::new_local(&bot_config.db_path)
            .await
            .with_context(|| format!("Failed to open database at {}", bot_config.db_path.display()))?;
        eprintln!("   Database: {}", bot_config.db_path.display());
        Arc::new(store)
    };

    let plugin = NotifyPlugin::new(notify_config, store, Arc::new(SmtpMailer::new()), &bot_config);
    eprintln!("   {}\n", cli::USAGE);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Error reading stdin")? {
        let event = match cli::parse_line(&line) {
            None => continue,
            Some(Ok(event)) => event,
            Some(Err(usage)) => {
                eprintln!("{usage}");
                continue;
            }
        };

        match plugin.handle(&event).await {
            Ok(Some(reply)) => println!("<{}> {}", plugin.bot_nick(), reply),
            Ok(None) => {}
            Err(e) => tracing::error!(error = %e, ?event, "Handler failed"),
        }
    }

    Ok(())
}
