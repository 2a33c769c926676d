//! Markdown document builder.

use std::fmt::Write;

/// A top-level element of a markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
enum MarkdownBlock {
    Heading { level: u8, text: String },
    List(Vec<String>),
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

/// Incrementally assembles a markdown document.
///
/// Blocks keep the order they were added in and are separated by a blank
/// line when the document is finished. Consecutive bullets share one list;
/// lists only exist once they have an item.
#[derive(Debug, Default)]
pub struct MarkdownBuilder {
    blocks: Vec<MarkdownBlock>,
}

impl MarkdownBuilder {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a level-2 heading.
    pub fn h2(&mut self, text: impl Into<String>) -> &mut Self {
        self.heading(2, text)
    }

    /// Add a level-3 heading.
    pub fn h3(&mut self, text: impl Into<String>) -> &mut Self {
        self.heading(3, text)
    }

    /// Add a level-4 heading.
    pub fn h4(&mut self, text: impl Into<String>) -> &mut Self {
        self.heading(4, text)
    }

    fn heading(&mut self, level: u8, text: impl Into<String>) -> &mut Self {
        self.blocks.push(MarkdownBlock::Heading {
            level,
            text: single_line(&text.into()),
        });
        self
    }

    /// Add a bullet, extending the list directly before it if there is one.
    pub fn bullet(&mut self, text: impl Into<String>) -> &mut Self {
        let item = single_line(&text.into());
        match self.blocks.last_mut() {
            Some(MarkdownBlock::List(items)) => items.push(item),
            _ => self.blocks.push(MarkdownBlock::List(vec![item])),
        }
        self
    }

    /// Add one bullet per item.
    pub fn bullets<I, S>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for item in items {
            self.bullet(item);
        }
        self
    }

    /// Append an inline badge to the most recent bullet.
    ///
    /// Does nothing when the document does not end with a list.
    pub fn badge(&mut self, text: &str) -> &mut Self {
        if let Some(MarkdownBlock::List(items)) = self.blocks.last_mut() {
            if let Some(item) = items.last_mut() {
                let _ = write!(item, " {}", badge(text));
            }
        }
        self
    }

    /// Add a table. Cells containing pipes are escaped.
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> &mut Self {
        self.blocks.push(MarkdownBlock::Table {
            headers: headers.iter().map(|h| table_cell(h)).collect(),
            rows: rows
                .into_iter()
                .map(|row| row.iter().map(|cell| table_cell(cell)).collect())
                .collect(),
        });
        self
    }

    /// True when nothing has been added yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Render the document.
    #[must_use]
    pub fn finish(&self) -> String {
        let mut md = String::new();

        for (index, block) in self.blocks.iter().enumerate() {
            if index > 0 {
                md.push('\n');
            }

            match block {
                MarkdownBlock::Heading { level, text } => {
                    let _ = writeln!(md, "{} {text}", "#".repeat(usize::from(*level)));
                }
                MarkdownBlock::List(items) => {
                    for item in items {
                        let _ = writeln!(md, "- {item}");
                    }
                }
                MarkdownBlock::Table { headers, rows } => {
                    let _ = writeln!(md, "| {} |", headers.join(" | "));
                    let _ = writeln!(md, "|{}", " --- |".repeat(headers.len()));
                    for row in rows {
                        let _ = writeln!(md, "| {} |", row.join(" | "));
                    }
                }
            }
        }

        md
    }
}

/// Inline badge token.
#[must_use]
pub fn badge(text: &str) -> String {
    format!("`{}`", single_line(text).replace('`', "'"))
}

/// Bold inline text.
#[must_use]
pub fn bold(text: &str) -> String {
    format!("**{text}**")
}

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

fn table_cell(text: &str) -> String {
    single_line(text).replace('|', "\\|")
}
