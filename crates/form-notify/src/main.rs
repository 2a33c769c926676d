//! form-notify CLI - render and deliver completed-form notifications.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use form_notify::{
    builtin_registry, EventKind, EventPayload, IntegrationType, NotificationInput, Notifier,
    NotifyConfig, Registry,
};

/// form-notify CLI - Render form events into provider webhooks.
#[derive(Parser)]
#[command(name = "form-notify")]
#[command(about = "Render and deliver completed-form notifications")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render an event and print the webhook as JSON
    Render {
        /// Integration name or id (generic, mattermost, slack, ntfy)
        #[arg(short, long)]
        integration: IntegrationType,

        /// Event kind to render
        #[arg(long, default_value = "form.finished")]
        event_kind: String,

        /// Event JSON file (reads stdin when omitted)
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Render an event and deliver it to the event-ingest service
    Send {
        /// Integration name or id (generic, mattermost, slack, ntfy)
        #[arg(short, long)]
        integration: IntegrationType,

        /// Event kind to render
        #[arg(long, default_value = "form.finished")]
        event_kind: String,

        /// Endpoint the service forwards the webhook to
        #[arg(long)]
        endpoint_id: String,

        /// Target project (defaults to NOTIFY_DEFAULT_PROJECT)
        #[arg(long)]
        project: Option<String>,

        /// Event JSON file (reads stdin when omitted)
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// List supported integrations
    Integrations,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("form_notify=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("form_notify=info,warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Render {
            integration,
            event_kind,
            input,
        } => {
            let event = read_event(input.as_deref())?;
            let webhook = builtin_registry()
                .render(Some(&event), integration, &event_kind)
                .with_context(|| format!("Failed to render {event_kind} for {integration}"))?;
            println!("{}", serde_json::to_string_pretty(&webhook)?);
        }

        Commands::Send {
            integration,
            event_kind,
            endpoint_id,
            project,
            input,
        } => {
            let config = NotifyConfig::from_env();
            if !config.is_configured() {
                anyhow::bail!("NOTIFY_URL and NOTIFY_API_KEY must be set to send webhooks");
            }

            let notifier = Notifier::from_config(Arc::new(Registry::builtin()), &config);
            let input = NotificationInput {
                event: Some(read_event(input.as_deref())?),
                event_kind,
                endpoint_id,
                project,
            };

            tracing::info!(
                integration = %integration,
                event_kind = %input.event_kind,
                endpoint_id = %input.endpoint_id,
                "Sending notification"
            );
            notifier
                .send_webhook(&input, integration)
                .await
                .context("Failed to send notification")?;
            tracing::info!("Notification sent");
        }

        Commands::Integrations => {
            for adapter in builtin_registry().iter() {
                let details = adapter.details;
                println!(
                    "{:<3} {:<12} {:<16} {:<22} {}",
                    adapter.integration.id(),
                    adapter.integration,
                    details.name,
                    details.icon,
                    details.color.unwrap_or("-")
                );
            }
            println!("\nSupported event kinds: {}", EventKind::FormFinished);
        }
    }

    Ok(())
}

/// Read an event from a file, or stdin when no path is given.
///
/// The JSON is passed on untyped; the renderer checks its shape.
fn read_event(path: Option<&Path>) -> Result<EventPayload> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read event from stdin")?;
            raw
        }
    };

    let value = serde_json::from_str(&raw).context("Event is not valid JSON")?;
    Ok(EventPayload::Json(value))
}
