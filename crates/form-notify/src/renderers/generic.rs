//! Generic webhook renderer.
//!
//! Sends the canonical event record as-is, for receivers that do their own
//! formatting.

use super::Webhook;
use crate::error::RenderError;
use crate::events::{EventKind, EventPayload};

const NAME: &str = "generic";

/// Render an event as a generic webhook.
///
/// # Errors
/// Returns [`RenderError::UnsupportedEventKind`] for event kinds other than
/// `form.finished` and [`RenderError::TypeMismatch`] when the payload is not
/// a form record.
pub fn render(payload: &EventPayload, event_kind: &str) -> Result<Webhook, RenderError> {
    match EventKind::parse(event_kind) {
        Some(EventKind::FormFinished) => {
            let record = payload.form_record()?;
            Webhook::from_document(&*record)
        }
        None => Err(RenderError::UnsupportedEventKind {
            integration: NAME,
            event_kind: event_kind.to_string(),
        }),
    }
}
