//! Provider renderers.
//!
//! Each renderer is a pure function from an event payload and an event kind
//! to a provider-specific [`Webhook`]. Renderers never perform I/O.

pub mod generic;
pub mod mattermost;
pub mod ntfy;
pub mod slack;

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::RenderError;
use crate::events::EventPayload;

/// Label used when a node carries no translation.
pub(crate) const MISSING_TRANSLATION: &str = "Missing Translation";

/// Title used for contact blocks that carry no label.
pub(crate) const CONTACT_INFORMATION: &str = "Contact Information";

/// Signature shared by all renderers: `(payload, event kind) -> webhook`.
pub type RenderFn = fn(&EventPayload, &str) -> Result<Webhook, RenderError>;

/// A rendered payload, ready to be handed to a delivery collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Webhook {
    /// Provider-specific JSON document
    pub data: serde_json::Value,
    /// Additional HTTP headers the provider needs
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, Vec<String>>,
}

impl Webhook {
    /// Build a webhook from any serializable document, without headers.
    ///
    /// # Errors
    /// Returns [`RenderError::Serialization`] if the document cannot be
    /// converted to JSON.
    pub fn from_document<T: Serialize>(document: &T) -> Result<Self, RenderError> {
        Ok(Self {
            data: serde_json::to_value(document)?,
            headers: BTreeMap::new(),
        })
    }

    /// Add a header value.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.entry(name.into()).or_default().push(value.into());
        self
    }
}

/// The label to display for a node, falling back when it is empty.
pub(crate) fn label_or<'a>(label: &'a str, fallback: &'a str) -> &'a str {
    if label.is_empty() {
        fallback
    } else {
        label
    }
}
