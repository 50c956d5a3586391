//! Content extraction from video watch pages.
//!
//! This module provides:
//! - `PageSource`, the read-only DOM surface, and `HtmlPage` over an HTML snapshot
//! - An ordered cascade of content strategies (captions, description, comments, metadata)
//! - `ContentExtractor`, which resolves title, duration and body text
//! - `ContentChannel` implementations the orchestrator reads content through

mod cascade;
mod channel;
mod config;
mod extractor;
pub mod metadata;
mod page;
pub mod selectors;

pub use cascade::{
    default_strategies, run_cascade, CaptionStrategy, CommentStrategy, ContentStrategy,
    DescriptionStrategy, MetadataStrategy,
};
#[cfg(test)]
pub use channel::MockContentChannel;
pub use channel::{ContentChannel, PageChannel};
#[cfg(feature = "http")]
pub use channel::HttpPageChannel;
pub use config::{ExtractionConfig, FetchConfig};
pub use extractor::{resolve_duration, resolve_title, ContentExtractor, INSUFFICIENT_CONTENT};
pub use page::{HtmlPage, PageSource};
