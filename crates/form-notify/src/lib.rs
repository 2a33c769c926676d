//! Webhook notifications for completed form submissions.
//!
//! This crate turns one canonical [`EventRecord`] into the payload a chat or
//! push provider expects, and optionally delivers it to an event-ingest
//! service.
//!
//! # Usage
//!
//! ```no_run
//! use form_notify::{render, EventPayload, EventRecord, IntegrationType};
//!
//! let event = EventPayload::from(EventRecord {
//!     title: "New survey response".to_string(),
//!     link_text: "view".to_string(),
//!     link_url: "https://forms.example.com/r/42".to_string(),
//!     ..EventRecord::default()
//! });
//!
//! let webhook = render(Some(&event), IntegrationType::Slack, "form.finished")?;
//! println!("{}", webhook.data);
//! # Ok::<(), form_notify::RenderError>(())
//! ```
//!
//! # Integrations
//!
//! - **Generic** - the event record as JSON
//! - **Mattermost** - a markdown attachment
//! - **Slack** - Block Kit blocks with rich text
//! - **Ntfy** - a markdown body with a title header
//!
//! # Configuration
//!
//! Delivery through [`Notifier`] is configured via environment variables:
//!
//! - `NOTIFY_URL`: base URL of the event-ingest service
//! - `NOTIFY_API_KEY`: bearer token for the service
//! - `NOTIFY_DEFAULT_PROJECT`: project used when an input names none
//! - `NOTIFY_TIMEOUT_SECS`: HTTP timeout (default 10)
//! - `NOTIFY_DISABLED`: Set to "true" to disable all deliveries

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod delivery;
pub mod document;
pub mod error;
pub mod events;
pub mod notifier;
pub mod registry;
pub mod renderers;

pub use config::NotifyConfig;
pub use delivery::{DeliveryRequest, HttpWebhookSender, WebhookSender};
pub use error::{DeliveryError, NotifyError, RenderError};
pub use events::{
    ChoiceElement, ChoiceInfo, ContactInfo, EventKind, EventPayload, EventRecord, FormNode,
    RatingElement, RatingInfo, SelectInfo,
};
pub use notifier::{NotificationInput, Notifier};
pub use registry::{IntegrationDetails, IntegrationType, Registry};
pub use renderers::Webhook;

use std::sync::OnceLock;

/// The built-in registry, created on first use and shared by all callers.
#[must_use]
pub fn builtin_registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(Registry::builtin)
}

/// Render an event with the built-in registry.
///
/// # Errors
/// See [`Registry::render`].
pub fn render(
    event: Option<&EventPayload>,
    integration: IntegrationType,
    event_kind: &str,
) -> Result<Webhook, RenderError> {
    builtin_registry().render(event, integration, event_kind)
}
