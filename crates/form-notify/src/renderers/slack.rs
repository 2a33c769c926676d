//! Slack incoming-webhook renderer using Block Kit.
//!
//! Layout: a `section` with the title and link, a `divider`, an optional
//! contact block, then one group of blocks per form node, each followed by
//! a `divider`.

use serde::Serialize;
use tracing::{debug, warn};

use super::{label_or, Webhook, CONTACT_INFORMATION, MISSING_TRANSLATION};
use crate::document::{Block, BlockTreeBuilder};
use crate::error::RenderError;
use crate::events::{ContactInfo, EventKind, EventPayload, EventRecord, FormNode};

const NAME: &str = "slack";

/// Render an event for Slack.
///
/// # Errors
/// Returns [`RenderError::UnsupportedEventKind`] for event kinds other than
/// `form.finished` and [`RenderError::TypeMismatch`] when the payload is not
/// a form record.
pub fn render(payload: &EventPayload, event_kind: &str) -> Result<Webhook, RenderError> {
    match EventKind::parse(event_kind) {
        Some(EventKind::FormFinished) => {
            let record = payload.form_record()?;
            Webhook::from_document(&SlackPayload {
                blocks: form_blocks(&record),
            })
        }
        None => Err(RenderError::UnsupportedEventKind {
            integration: NAME,
            event_kind: event_kind.to_string(),
        }),
    }
}

fn form_blocks(record: &EventRecord) -> Vec<Block> {
    let mut tree = BlockTreeBuilder::new();

    tree.section(format!(
        "{} <{}|{}>",
        record.title, record.link_url, record.link_text
    ))
    .divider();

    if let Some(contact) = &record.contact {
        contact_block(
            &mut tree,
            label_or(&record.form_translation, CONTACT_INFORMATION),
            contact,
        );
    }

    for (index, node) in record.nodes.iter().enumerate() {
        match node {
            FormNode::Choice { label, choice } => {
                tree.rich_text(|rt| {
                    rt.title(label_or(label, MISSING_TRANSLATION));
                    for element in choice.elements.iter().filter(|e| !e.label.is_empty()) {
                        rt.bullet_list([element.label.as_str()]);
                        for answer in element.answers() {
                            rt.preformatted(answer);
                        }
                    }
                });
            }
            FormNode::Select { label, select } => {
                tree.rich_text(|rt| {
                    rt.title(titled(&select.label, label))
                        .bullet_list(select.options.iter().map(String::as_str));
                });
            }
            FormNode::Contact { label, contact } => {
                contact_block(&mut tree, label_or(label, CONTACT_INFORMATION), contact);
            }
            FormNode::Rating { label, rating } => {
                tree.rich_text(|rt| {
                    rt.title(titled(&rating.label, label)).bullet_list(
                        rating
                            .elements
                            .iter()
                            .map(|e| format!("{}: {}/10 ⭐", e.label, e.value)),
                    );
                });
            }
            FormNode::Unknown => {
                warn!(
                    integration = NAME,
                    node_index = index,
                    "Unknown form node kind, skipping"
                );
                continue;
            }
        }

        tree.divider();
    }

    debug!(
        integration = NAME,
        node_count = record.nodes.len(),
        block_count = tree.len(),
        "Rendered form blocks"
    );

    tree.build()
}

/// Title of a select or rating block: its own label, then the node label.
fn titled<'a>(own: &'a str, node_label: &'a str) -> &'a str {
    label_or(own, label_or(node_label, MISSING_TRANSLATION))
}

fn contact_block(tree: &mut BlockTreeBuilder, title: &str, contact: &ContactInfo) {
    if contact.is_empty() {
        return;
    }

    tree.rich_text(|rt| {
        rt.title(title).bullet_list(
            contact
                .fields()
                .map(|(label, value)| format!("{label}: {value}")),
        );
    });
}

// =============================================================================
// Slack API types (Block Kit)
// =============================================================================

#[derive(Debug, Serialize)]
struct SlackPayload {
    blocks: Vec<Block>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderers::fixtures;
    use serde_json::json;

    fn kinds(blocks: &[Block]) -> Vec<&'static str> {
        blocks.iter().map(Block::kind).collect()
    }

    #[test]
    fn test_rating_scenario() {
        let blocks = form_blocks(&fixtures::survey());

        assert_eq!(kinds(&blocks), vec!["section", "divider", "rich_text", "divider"]);

        let value = serde_json::to_value(&blocks[2]).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "rich_text",
                "elements": [
                    {
                        "type": "rich_text_section",
                        "elements": [{"type": "text", "text": "Satisfaction", "style": {"bold": true}}]
                    },
                    {
                        "type": "rich_text_list",
                        "style": "bullet",
                        "elements": [
                            {"type": "rich_text_section", "elements": [{"type": "text", "text": "Speed: 8/10 ⭐"}]},
                            {"type": "rich_text_section", "elements": [{"type": "text", "text": "Support: 6/10 ⭐"}]}
                        ]
                    }
                ]
            })
        );
    }

    #[test]
    fn test_header_section_text() {
        let blocks = form_blocks(&fixtures::survey());

        match &blocks[0] {
            Block::Section { text } => assert_eq!(text.text(), "Survey <http://x|view>"),
            other => panic!("expected section, got {other:?}"),
        }
    }

    #[test]
    fn test_contact_block() {
        let mut record = fixtures::survey();
        record.nodes.clear();
        record.contact = Some(fixtures::contact());

        let blocks = form_blocks(&record);
        assert_eq!(kinds(&blocks), vec!["section", "divider", "rich_text"]);

        let value = serde_json::to_value(&blocks[2]).unwrap();
        assert_eq!(value["elements"][0]["elements"][0]["text"], json!("Form"));
        assert_eq!(
            value["elements"][1]["elements"][2]["elements"][0]["text"],
            json!("Email: ada@example.com")
        );
    }

    #[test]
    fn test_empty_contact_emits_nothing() {
        let mut record = fixtures::survey();
        record.nodes = vec![FormNode::Contact {
            label: String::new(),
            contact: ContactInfo::default(),
        }];
        record.contact = Some(ContactInfo::default());

        let blocks = form_blocks(&record);
        assert_eq!(kinds(&blocks), vec!["section", "divider", "divider"]);
    }

    #[test]
    fn test_choice_block() {
        let mut record = fixtures::survey();
        record.nodes = vec![fixtures::choice_node()];

        let blocks = form_blocks(&record);
        let value = serde_json::to_value(&blocks[2]).unwrap();
        let element_types: Vec<_> = value["elements"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["type"].as_str().unwrap().to_string())
            .collect();

        assert_eq!(
            element_types,
            vec![
                "rich_text_section",
                "rich_text_list",
                "rich_text_list",
                "rich_text_preformatted",
                "rich_text_preformatted",
            ]
        );
        assert_eq!(value["elements"][3]["elements"][0]["text"], json!("A friend"));
        assert_eq!(
            value["elements"][4]["elements"][0]["text"],
            json!("Met at a meetup")
        );
    }

    #[test]
    fn test_select_block_title() {
        let mut record = fixtures::survey();
        record.nodes = vec![fixtures::select_node()];

        let blocks = form_blocks(&record);
        let value = serde_json::to_value(&blocks[2]).unwrap();
        assert_eq!(
            value["elements"][0]["elements"][0]["text"],
            json!("Pick all that apply")
        );
        assert_eq!(value["elements"][1]["elements"][1]["elements"][0]["text"], json!("Go"));
    }

    #[test]
    fn test_unknown_node_contributes_nothing() {
        let mut record = fixtures::survey();
        record.nodes = vec![FormNode::Unknown, fixtures::rating_node()];

        let blocks = form_blocks(&record);
        assert_eq!(kinds(&blocks), vec!["section", "divider", "rich_text", "divider"]);
    }

    #[test]
    fn test_unsupported_event_kind() {
        let payload = EventPayload::from(fixtures::survey());
        let err = render(&payload, "unknown.kind").unwrap_err();

        assert!(matches!(
            err,
            RenderError::UnsupportedEventKind { integration: "slack", .. }
        ));
    }
}
