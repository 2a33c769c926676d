//! Structured output assemblers shared by the renderers.
//!
//! - [`markdown::MarkdownBuilder`] for markdown-based providers (Mattermost, ntfy)
//! - [`blocks::BlockTreeBuilder`] for Slack's Block Kit

pub mod blocks;
pub mod markdown;

pub use blocks::{Block, BlockTreeBuilder, RichTextBuilder};
pub use markdown::MarkdownBuilder;
