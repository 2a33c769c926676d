//! ntfy renderer.
//!
//! ntfy takes the message body as plain text and the title as a header, so
//! the form is sent as the same markdown document Mattermost receives.

use super::{mattermost, Webhook};
use crate::error::RenderError;
use crate::events::{EventKind, EventPayload};

const NAME: &str = "ntfy";

/// Header carrying the notification title.
pub const TITLE_HEADER: &str = "X-Title";

/// Header enabling markdown rendering of the body.
pub const MARKDOWN_HEADER: &str = "X-Markdown";

/// Render an event for ntfy.
///
/// # Errors
/// Returns [`RenderError::UnsupportedEventKind`] for event kinds other than
/// `form.finished` and [`RenderError::TypeMismatch`] when the payload is not
/// a form record.
pub fn render(payload: &EventPayload, event_kind: &str) -> Result<Webhook, RenderError> {
    match EventKind::parse(event_kind) {
        Some(EventKind::FormFinished) => {
            let record = payload.form_record()?;
            let body = mattermost::form_document(&record);
            Ok(Webhook::from_document(&body)?
                .with_header(TITLE_HEADER, record.title.as_str())
                .with_header(MARKDOWN_HEADER, "yes"))
        }
        None => Err(RenderError::UnsupportedEventKind {
            integration: NAME,
            event_kind: event_kind.to_string(),
        }),
    }
}
