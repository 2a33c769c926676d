//! Integration registry and render dispatcher.
//!
//! The registry maps each supported integration to its renderer and display
//! metadata. It is built once and never mutated afterwards, so a single
//! instance can be shared freely between threads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, instrument};

use crate::error::RenderError;
use crate::events::EventPayload;
use crate::renderers::{self, RenderFn, Webhook};

/// Integrations a webhook can be rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationType {
    Generic,
    Mattermost,
    Slack,
    Ntfy,
}

impl IntegrationType {
    /// Every integration, in id order.
    pub const ALL: [Self; 4] = [Self::Generic, Self::Mattermost, Self::Slack, Self::Ntfy];

    /// Stable numeric id.
    #[must_use]
    pub const fn id(&self) -> i64 {
        match self {
            Self::Generic => 0,
            Self::Mattermost => 1,
            Self::Slack => 2,
            Self::Ntfy => 3,
        }
    }

    /// Lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Mattermost => "mattermost",
            Self::Slack => "slack",
            Self::Ntfy => "ntfy",
        }
    }

    /// Renderer for this integration.
    #[must_use]
    pub fn renderer(&self) -> RenderFn {
        match self {
            Self::Generic => renderers::generic::render,
            Self::Mattermost => renderers::mattermost::render,
            Self::Slack => renderers::slack::render,
            Self::Ntfy => renderers::ntfy::render,
        }
    }

    /// Human-readable metadata for this integration.
    #[must_use]
    pub const fn details(&self) -> IntegrationDetails {
        match self {
            Self::Generic => IntegrationDetails {
                name: "Generic Webhook",
                icon: "logos:webhooks",
                color: None,
            },
            Self::Mattermost => IntegrationDetails {
                name: "Mattermost",
                icon: "logos:mattermost-icon",
                color: None,
            },
            Self::Slack => IntegrationDetails {
                name: "Slack",
                icon: "logos:slack-icon",
                color: None,
            },
            Self::Ntfy => IntegrationDetails {
                name: "Ntfy",
                icon: "simple-icons:ntfy",
                color: Some("#10b981"),
            },
        }
    }
}

impl fmt::Display for IntegrationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl TryFrom<i64> for IntegrationType {
    type Error = RenderError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|integration| integration.id() == id)
            .ok_or_else(|| RenderError::UnsupportedIntegration(id.to_string()))
    }
}

impl FromStr for IntegrationType {
    type Err = RenderError;

    /// Accepts either the lowercase name or the numeric id.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if let Ok(id) = value.parse::<i64>() {
            return Self::try_from(id);
        }

        Self::ALL
            .into_iter()
            .find(|integration| integration.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| RenderError::UnsupportedIntegration(value.to_string()))
    }
}

/// Display metadata of an integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntegrationDetails {
    pub name: &'static str,
    pub icon: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
}

/// A registered integration.
#[derive(Clone, Copy)]
pub struct Adapter {
    pub integration: IntegrationType,
    pub details: IntegrationDetails,
    render: RenderFn,
}

impl Adapter {
    #[must_use]
    pub fn new(integration: IntegrationType) -> Self {
        Self {
            integration,
            details: integration.details(),
            render: integration.renderer(),
        }
    }
}

impl fmt::Debug for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("integration", &self.integration)
            .field("details", &self.details)
            .finish_non_exhaustive()
    }
}

/// Read-only mapping from integration to renderer.
#[derive(Debug, Clone)]
pub struct Registry {
    adapters: BTreeMap<IntegrationType, Adapter>,
}

impl Registry {
    /// Registry with every built-in integration.
    #[must_use]
    pub fn builtin() -> Self {
        Self::with_integrations(IntegrationType::ALL)
    }

    /// Registry restricted to the given integrations.
    #[must_use]
    pub fn with_integrations(integrations: impl IntoIterator<Item = IntegrationType>) -> Self {
        let adapters = integrations
            .into_iter()
            .map(|integration| (integration, Adapter::new(integration)))
            .collect();
        Self { adapters }
    }

    /// Look up a registered integration.
    #[must_use]
    pub fn get(&self, integration: IntegrationType) -> Option<&Adapter> {
        self.adapters.get(&integration)
    }

    /// Display metadata for a registered integration.
    #[must_use]
    pub fn details(&self, integration: IntegrationType) -> Option<IntegrationDetails> {
        self.get(integration).map(|adapter| adapter.details)
    }

    /// Registered integrations in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Adapter> {
        self.adapters.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Render `event` for `integration`.
    ///
    /// # Errors
    /// - [`RenderError::InvalidInput`] when `event` is `None`
    /// - [`RenderError::UnsupportedIntegration`] when the integration is not registered
    /// - [`RenderError::UnsupportedEventKind`] when the renderer does not know `event_kind`
    /// - [`RenderError::TypeMismatch`] when the payload does not fit `event_kind`
    #[instrument(skip(self, event))]
    pub fn render(
        &self,
        event: Option<&EventPayload>,
        integration: IntegrationType,
        event_kind: &str,
    ) -> Result<Webhook, RenderError> {
        let event = event.ok_or(RenderError::InvalidInput)?;
        let adapter = self
            .get(integration)
            .ok_or_else(|| RenderError::UnsupportedIntegration(integration.to_string()))?;

        let webhook = (adapter.render)(event, event_kind)?;
        debug!(header_count = webhook.headers.len(), "Rendered webhook");
        Ok(webhook)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventRecord;

    #[test]
    fn test_parse_integration() {
        assert_eq!("slack".parse::<IntegrationType>().unwrap(), IntegrationType::Slack);
        assert_eq!("Mattermost".parse::<IntegrationType>().unwrap(), IntegrationType::Mattermost);
        assert_eq!("3".parse::<IntegrationType>().unwrap(), IntegrationType::Ntfy);
        assert!(matches!(
            "teams".parse::<IntegrationType>(),
            Err(RenderError::UnsupportedIntegration(_))
        ));
        assert!(matches!(
            IntegrationType::try_from(4),
            Err(RenderError::UnsupportedIntegration(_))
        ));
    }

    #[test]
    fn test_builtin_details() {
        let registry = Registry::builtin();
        assert_eq!(registry.len(), 4);

        let ntfy = registry.details(IntegrationType::Ntfy).unwrap();
        assert_eq!(ntfy.name, "Ntfy");
        assert_eq!(ntfy.color, Some("#10b981"));

        let ids: Vec<_> = registry.iter().map(|a| a.integration.id()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_render_requires_event() {
        let registry = Registry::builtin();
        let err = registry
            .render(None, IntegrationType::Slack, "form.finished")
            .unwrap_err();
        assert!(matches!(err, RenderError::InvalidInput));
    }

    #[test]
    fn test_unregistered_integration() {
        let registry = Registry::with_integrations([IntegrationType::Slack]);
        let event = EventPayload::from(EventRecord::default());

        let err = registry
            .render(Some(&event), IntegrationType::Mattermost, "form.finished")
            .unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedIntegration(name) if name == "mattermost"));
        assert!(registry.details(IntegrationType::Mattermost).is_none());
    }
}
