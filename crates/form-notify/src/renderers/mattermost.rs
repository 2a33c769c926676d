//! Mattermost incoming-webhook renderer.
//!
//! The form is rendered as one markdown document carried by a single
//! coloured attachment. The top-level `text` holds the title and a link back
//! to the submission.

use serde::Serialize;
use tracing::{debug, warn};

use super::{label_or, Webhook, MISSING_TRANSLATION};
use crate::document::markdown::bold;
use crate::document::MarkdownBuilder;
use crate::error::RenderError;
use crate::events::{ContactInfo, EventKind, EventPayload, EventRecord, FormNode};

/// Accent colour of the attachment strip.
pub const ATTACHMENT_COLOR: &str = "#1B5495";

const NAME: &str = "mattermost";

/// Render an event for Mattermost.
///
/// # Errors
/// Returns [`RenderError::UnsupportedEventKind`] for event kinds other than
/// `form.finished` and [`RenderError::TypeMismatch`] when the payload is not
/// a form record.
pub fn render(payload: &EventPayload, event_kind: &str) -> Result<Webhook, RenderError> {
    match EventKind::parse(event_kind) {
        Some(EventKind::FormFinished) => {
            let record = payload.form_record()?;
            Webhook::from_document(&format_payload(&record))
        }
        None => Err(RenderError::UnsupportedEventKind {
            integration: NAME,
            event_kind: event_kind.to_string(),
        }),
    }
}

fn format_payload(record: &EventRecord) -> MattermostPayload {
    MattermostPayload {
        text: format!(
            "{} [{}]({})",
            record.title, record.link_text, record.link_url
        ),
        attachments: vec![MattermostAttachment {
            text: form_document(record),
            color: ATTACHMENT_COLOR,
        }],
    }
}

/// Render the form body as markdown.
///
/// Shared with other markdown-based providers.
pub(crate) fn form_document(record: &EventRecord) -> String {
    let mut md = MarkdownBuilder::new();

    md.h2(record.form_translation.as_str());
    if let Some(contact) = &record.contact {
        contact_list(&mut md, contact);
    }

    for (index, node) in record.nodes.iter().enumerate() {
        match node {
            FormNode::Choice { label, choice } => {
                md.h3(label_or(label, MISSING_TRANSLATION));
                for element in choice.elements.iter().filter(|e| !e.label.is_empty()) {
                    md.bullet(element.label.as_str());
                    for answer in element.answers() {
                        md.badge(answer);
                    }
                }
            }
            FormNode::Select { label, select } => {
                md.h3(label_or(label, MISSING_TRANSLATION));
                md.h4(select.label.as_str());
                md.bullets(select.options.iter().map(String::as_str));
            }
            FormNode::Contact { label, contact } => {
                md.h3(label_or(label, MISSING_TRANSLATION));
                contact_list(&mut md, contact);
            }
            FormNode::Rating { label, rating } => {
                md.h3(label_or(label, MISSING_TRANSLATION));
                md.h4(rating.label.as_str());
                let rows = rating
                    .elements
                    .iter()
                    .map(|e| vec![e.label.clone(), format!("{}/10 ★", e.value)])
                    .collect();
                md.table(&["Label", "Rating"], rows);
            }
            FormNode::Unknown => {
                warn!(
                    integration = NAME,
                    node_index = index,
                    "Unknown form node kind, skipping"
                );
            }
        }
    }

    debug!(
        integration = NAME,
        node_count = record.nodes.len(),
        "Rendered form document"
    );

    md.finish()
}

fn contact_list(md: &mut MarkdownBuilder, contact: &ContactInfo) {
    md.bullets(
        contact
            .fields()
            .map(|(label, value)| format!("{}: {value}", bold(label))),
    );
}

// =============================================================================
// Mattermost API types
// =============================================================================

#[derive(Debug, Serialize)]
struct MattermostPayload {
    text: String,
    attachments: Vec<MattermostAttachment>,
}

#[derive(Debug, Serialize)]
struct MattermostAttachment {
    text: String,
    color: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderers::fixtures;
    use serde_json::json;

    #[test]
    fn test_mattermost_payload_shape() {
        let record = fixtures::survey();
        let webhook = render(&EventPayload::from(record), "form.finished").unwrap();

        assert_eq!(webhook.data["text"], json!("Survey [view](http://x)"));
        assert_eq!(webhook.data["attachments"][0]["color"], json!("#1B5495"));
        assert!(webhook.headers.is_empty());
    }

    #[test]
    fn test_rating_table() {
        let doc = form_document(&fixtures::survey());

        assert_eq!(
            doc,
            "## Form\n\n### Satisfaction\n\n#### Satisfaction\n\n\
             | Label | Rating |\n| --- | --- |\n| Speed | 8/10 ★ |\n| Support | 6/10 ★ |\n"
        );
    }

    #[test]
    fn test_contact_omits_empty_fields() {
        let mut record = fixtures::survey();
        record.nodes.clear();
        record.contact = Some(fixtures::contact());

        let doc = form_document(&record);
        assert_eq!(
            doc,
            "## Form\n\n- **First Name**: Ada\n- **Last Name**: Lovelace\n- **Email**: ada@example.com\n"
        );
    }

    #[test]
    fn test_empty_contact_emits_no_list() {
        let mut record = fixtures::survey();
        record.nodes.clear();
        record.contact = Some(ContactInfo::default());

        assert_eq!(form_document(&record), "## Form\n");
    }

    #[test]
    fn test_choice_badges() {
        let mut record = fixtures::survey();
        record.nodes = vec![fixtures::choice_node()];

        let doc = form_document(&record);
        assert!(doc.contains("### Source\n\n- Search\n- Other `A friend` `Met at a meetup`\n"));
    }

    #[test]
    fn test_select_list() {
        let mut record = fixtures::survey();
        record.nodes = vec![fixtures::select_node()];

        let doc = form_document(&record);
        assert!(doc.ends_with("### Interests\n\n#### Pick all that apply\n\n- Rust\n- Go\n"));
    }

    #[test]
    fn test_missing_label_falls_back() {
        let mut record = fixtures::survey();
        record.nodes = vec![FormNode::Contact {
            label: String::new(),
            contact: fixtures::contact(),
        }];

        assert!(form_document(&record).contains("### Missing Translation\n"));
    }

    #[test]
    fn test_unknown_node_is_skipped() {
        let mut record = fixtures::survey();
        record.nodes = vec![FormNode::Unknown, fixtures::select_node()];

        let doc = form_document(&record);
        assert!(doc.starts_with("## Form\n\n### Interests\n"));
    }

    #[test]
    fn test_unsupported_event_kind() {
        let payload = EventPayload::from(fixtures::survey());
        let err = render(&payload, "form.started").unwrap_err();

        assert!(matches!(
            err,
            RenderError::UnsupportedEventKind { integration: "mattermost", .. }
        ));
    }
}
