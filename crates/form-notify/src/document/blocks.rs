//! Block-tree document builder producing Slack Block Kit blocks.

use serde::Serialize;

// =============================================================================
// Block Kit types
// =============================================================================

/// A top-level layout block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Section block with text
    Section { text: TextObject },
    /// Divider line
    Divider,
    /// Rich text container
    RichText { elements: Vec<RichTextElement> },
}

impl Block {
    /// Block Kit type name, as it appears on the wire.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Section { .. } => "section",
            Self::Divider => "divider",
            Self::RichText { .. } => "rich_text",
        }
    }
}

/// Text object used by section blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextObject {
    #[serde(rename = "type")]
    text_type: &'static str,
    text: String,
}

impl TextObject {
    #[must_use]
    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self {
            text_type: "mrkdwn",
            text: text.into(),
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Child element of a rich text block. Lists nest further elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RichTextElement {
    RichTextSection {
        elements: Vec<RichTextNode>,
    },
    RichTextList {
        style: ListStyle,
        elements: Vec<RichTextElement>,
    },
    RichTextPreformatted {
        elements: Vec<RichTextNode>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    Bullet,
}

/// Leaf of a rich text element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RichTextNode {
    Text {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        style: Option<TextStyle>,
    },
}

impl RichTextNode {
    fn plain(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            style: None,
        }
    }

    fn bold(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            style: Some(TextStyle { bold: true }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextStyle {
    pub bold: bool,
}

// =============================================================================
// Builders
// =============================================================================

/// Assembles an ordered sequence of blocks.
#[derive(Debug, Default)]
pub struct BlockTreeBuilder {
    blocks: Vec<Block>,
}

impl BlockTreeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a section block with markdown-flavoured text.
    pub fn section(&mut self, text: impl Into<String>) -> &mut Self {
        self.blocks.push(Block::Section {
            text: TextObject::mrkdwn(text),
        });
        self
    }

    pub fn divider(&mut self) -> &mut Self {
        self.blocks.push(Block::Divider);
        self
    }

    /// Add a rich text block whose elements are filled in by `build`.
    ///
    /// The block is dropped if `build` adds nothing.
    pub fn rich_text(&mut self, build: impl FnOnce(&mut RichTextBuilder)) -> &mut Self {
        let mut rich = RichTextBuilder::default();
        build(&mut rich);
        if !rich.elements.is_empty() {
            self.blocks.push(Block::RichText {
                elements: rich.elements,
            });
        }
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    #[must_use]
    pub fn build(self) -> Vec<Block> {
        self.blocks
    }
}

/// Assembles the ordered children of one rich text block.
#[derive(Debug, Default)]
pub struct RichTextBuilder {
    elements: Vec<RichTextElement>,
}

impl RichTextBuilder {
    /// Add a bold title line.
    pub fn title(&mut self, text: impl Into<String>) -> &mut Self {
        self.elements.push(RichTextElement::RichTextSection {
            elements: vec![RichTextNode::bold(text)],
        });
        self
    }

    /// Add a bulleted list with one entry per item. Empty lists are skipped.
    pub fn bullet_list<I, S>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<_> = items
            .into_iter()
            .map(|item| RichTextElement::RichTextSection {
                elements: vec![RichTextNode::plain(item)],
            })
            .collect();

        if !entries.is_empty() {
            self.elements.push(RichTextElement::RichTextList {
                style: ListStyle::Bullet,
                elements: entries,
            });
        }
        self
    }

    /// Add a preformatted text element.
    pub fn preformatted(&mut self, text: impl Into<String>) -> &mut Self {
        self.elements.push(RichTextElement::RichTextPreformatted {
            elements: vec![RichTextNode::plain(text)],
        });
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
