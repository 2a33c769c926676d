//! Error types for rendering and delivering webhooks.

use thiserror::Error;

/// Errors that terminate a single render call.
///
/// A failed render never produces a partial payload.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No event was supplied
    #[error("Invalid input: event not defined")]
    InvalidInput,

    /// No renderer is registered for the requested integration
    #[error("Unsupported integration: {0}")]
    UnsupportedIntegration(String),

    /// The renderer does not know this event kind
    #[error("Integration {integration} does not support event kind '{event_kind}'")]
    UnsupportedEventKind {
        integration: &'static str,
        event_kind: String,
    },

    /// The event payload does not have the shape the event kind requires
    #[error("Payload does not match event kind '{event_kind}': {reason}")]
    TypeMismatch { event_kind: String, reason: String },

    /// The rendered document could not be converted to JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors that can occur when delivering a rendered webhook.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Delivery is not configured
    #[error("Delivery not configured: {0}")]
    NotConfigured(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A provider header could not be encoded as an HTTP header
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Rate limited by the service
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// The service answered with an error status
    #[error("Error status code {status}: {body}")]
    Status { status: u16, body: String },
}

/// Errors surfaced by [`crate::Notifier`].
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}
