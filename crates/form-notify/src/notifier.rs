//! Render-and-deliver entry point.

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::NotifyConfig;
use crate::delivery::{DeliveryRequest, HttpWebhookSender, WebhookSender};
use crate::error::NotifyError;
use crate::events::{EventKind, EventPayload};
use crate::registry::{IntegrationType, Registry};

/// One notification to render and deliver.
#[derive(Debug, Clone)]
pub struct NotificationInput {
    /// Event to announce; `None` is rejected as invalid input
    pub event: Option<EventPayload>,
    /// Wire identifier of the event kind, e.g. `form.finished`
    pub event_kind: String,
    /// Endpoint the ingest service should forward to
    pub endpoint_id: String,
    /// Target project; the configured default is used when absent
    pub project: Option<String>,
}

impl NotificationInput {
    /// A `form.finished` notification for an endpoint.
    #[must_use]
    pub fn form_finished(event: impl Into<EventPayload>, endpoint_id: impl Into<String>) -> Self {
        Self {
            event: Some(event.into()),
            event_kind: EventKind::FormFinished.to_string(),
            endpoint_id: endpoint_id.into(),
            project: None,
        }
    }

    /// Target a specific project.
    #[must_use]
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }
}

/// Renders notifications through the registry and hands them to a sender.
pub struct Notifier {
    registry: Arc<Registry>,
    sender: Option<Arc<dyn WebhookSender>>,
    default_project: String,
}

impl Notifier {
    /// Create a notifier from environment variables.
    ///
    /// Delivery is disabled when `NOTIFY_DISABLED` is set or when the
    /// service URL or API key is missing.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_config(Arc::new(Registry::builtin()), &NotifyConfig::from_env())
    }

    /// Create a notifier from explicit configuration.
    #[must_use]
    pub fn from_config(registry: Arc<Registry>, config: &NotifyConfig) -> Self {
        if config.disabled {
            info!("Notifications disabled via NOTIFY_DISABLED");
            return Self::disabled(registry);
        }

        match HttpWebhookSender::from_config(config) {
            Ok(sender) => {
                info!(
                    integration_count = registry.len(),
                    "Webhook delivery initialized"
                );
                Self::with_sender(registry, Arc::new(sender), config.default_project.clone())
            }
            Err(e) => {
                warn!(error = %e, "Webhook delivery not configured");
                Self::disabled(registry)
            }
        }
    }

    /// Create a notifier with a specific sender.
    #[must_use]
    pub fn with_sender(
        registry: Arc<Registry>,
        sender: Arc<dyn WebhookSender>,
        default_project: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            sender: Some(sender),
            default_project: default_project.into(),
        }
    }

    /// Create a notifier that never delivers.
    #[must_use]
    pub fn disabled(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            sender: None,
            default_project: String::new(),
        }
    }

    /// Check if deliveries are enabled.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.sender.is_some()
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Render a notification and wait for its delivery.
    ///
    /// A disabled notifier returns `Ok(())` without rendering.
    ///
    /// # Errors
    /// Returns [`NotifyError::Render`] when rendering fails and
    /// [`NotifyError::Delivery`] when the sender reports a failure.
    pub async fn send_webhook(
        &self,
        input: &NotificationInput,
        integration: IntegrationType,
    ) -> Result<(), NotifyError> {
        let Some(sender) = &self.sender else {
            debug!("Notifications disabled, skipping event");
            return Ok(());
        };

        let webhook = self
            .registry
            .render(input.event.as_ref(), integration, &input.event_kind)?;

        let project = input
            .project
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(&self.default_project);

        sender
            .send(DeliveryRequest {
                webhook: &webhook,
                project,
                endpoint_id: &input.endpoint_id,
                event_kind: &input.event_kind,
            })
            .await?;

        debug!(
            sender = sender.name(),
            integration = %integration,
            project,
            "Notification sent"
        );
        Ok(())
    }

    /// Send a notification without waiting (fire-and-forget).
    ///
    /// Spawns a task on the current tokio runtime. Errors are logged but not
    /// propagated to the caller.
    pub fn notify(self: &Arc<Self>, input: NotificationInput, integration: IntegrationType) {
        if !self.enabled() {
            debug!("Notifications disabled, skipping event");
            return;
        }

        let notifier = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = notifier.send_webhook(&input, integration).await {
                error!(
                    integration = %integration,
                    endpoint_id = %input.endpoint_id,
                    error = %e,
                    "Failed to send notification"
                );
            }
        });
    }
}
