//! Ordered content strategies; the first sufficient one wins.

use super::config::ExtractionConfig;
use super::metadata;
use super::page::PageSource;
use super::selectors;
use crate::context::ContentSource;
use crate::utils::truncate_with_ellipsis;
use async_trait::async_trait;
use tracing::debug;

/// One way of getting body text out of a page.
#[async_trait]
pub trait ContentStrategy: Send + Sync {
    /// Which source this strategy reads.
    fn source(&self) -> ContentSource;

    /// Minimum trimmed length, exclusive, for a result to be used.
    fn min_chars(&self, config: &ExtractionConfig) -> usize;

    /// Reads candidate text from the page.
    async fn attempt(
        &self,
        page: &dyn PageSource,
        config: &ExtractionConfig,
        title: &str,
    ) -> Option<String>;

    /// Returns true if `text` is long enough to use.
    fn is_sufficient(&self, text: &str, config: &ExtractionConfig) -> bool {
        text.trim().chars().count() > self.min_chars(config)
    }
}

/// Concatenates every caption or transcript segment.
#[derive(Debug, Default, Clone, Copy)]
pub struct CaptionStrategy;

#[async_trait]
impl ContentStrategy for CaptionStrategy {
    fn source(&self) -> ContentSource {
        ContentSource::Captions
    }

    fn min_chars(&self, config: &ExtractionConfig) -> usize {
        config.caption_min_chars
    }

    async fn attempt(
        &self,
        page: &dyn PageSource,
        _config: &ExtractionConfig,
        _title: &str,
    ) -> Option<String> {
        let text = page
            .select_many(selectors::CAPTIONS)
            .into_iter()
            .flatten()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Some(text).filter(|t| !t.is_empty())
    }
}

/// Takes the first long enough description element.
#[derive(Debug, Default, Clone, Copy)]
pub struct DescriptionStrategy;

#[async_trait]
impl ContentStrategy for DescriptionStrategy {
    fn source(&self) -> ContentSource {
        ContentSource::Description
    }

    fn min_chars(&self, config: &ExtractionConfig) -> usize {
        config.description_min_chars
    }

    async fn attempt(
        &self,
        page: &dyn PageSource,
        config: &ExtractionConfig,
        _title: &str,
    ) -> Option<String> {
        if !page
            .wait_for(
                selectors::DESCRIPTION_REGION,
                config.description_wait(),
                config.poll_interval(),
            )
            .await
        {
            debug!("Description region did not appear");
        }
        page.select_many(selectors::DESCRIPTION)
            .into_iter()
            .find_map(|texts| {
                texts
                    .into_iter()
                    .next()
                    .map(|t| t.trim().to_string())
                    .filter(|t| t.chars().count() > config.description_element_chars)
                    .map(|t| truncate_with_ellipsis(&t, config.description_max_chars))
            })
    }
}

/// Collects the first few substantial comments.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommentStrategy;

#[async_trait]
impl ContentStrategy for CommentStrategy {
    fn source(&self) -> ContentSource {
        ContentSource::Comments
    }

    fn min_chars(&self, config: &ExtractionConfig) -> usize {
        config.comments_min_chars
    }

    async fn attempt(
        &self,
        page: &dyn PageSource,
        config: &ExtractionConfig,
        _title: &str,
    ) -> Option<String> {
        if !page
            .wait_for(
                selectors::COMMENTS_REGION,
                config.comments_wait(),
                config.poll_interval(),
            )
            .await
        {
            debug!("Comment region did not appear");
        }
        let comments: String = page
            .select_many(selectors::COMMENTS)
            .into_iter()
            .flatten()
            .map(|t| t.trim().to_string())
            .filter(|t| t.chars().count() > config.comment_element_chars)
            .take(config.max_comments)
            .map(|t| format!("Comment: {t}\n\n"))
            .collect();
        Some(comments).filter(|c| !c.is_empty())
    }
}

/// Synthesizes text from the title, channel name and view info.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetadataStrategy;

#[async_trait]
impl ContentStrategy for MetadataStrategy {
    fn source(&self) -> ContentSource {
        ContentSource::Metadata
    }

    fn min_chars(&self, config: &ExtractionConfig) -> usize {
        config.metadata_min_chars
    }

    async fn attempt(
        &self,
        page: &dyn PageSource,
        _config: &ExtractionConfig,
        title: &str,
    ) -> Option<String> {
        let candidates: Vec<&str> = selectors::CHANNEL
            .iter()
            .chain(selectors::INFO)
            .copied()
            .collect();
        let mut found = page.select_many(&candidates);
        let info: Vec<String> = found
            .split_off(selectors::CHANNEL.len())
            .into_iter()
            .filter_map(|texts| texts.into_iter().next())
            .collect();
        let channel = first_nonempty(found);
        Some(metadata::synthesize(title, channel.as_deref(), &info))
    }
}

/// Returns the first non-empty trimmed text over `candidates`.
pub(crate) fn first_text(page: &dyn PageSource, candidates: &[&str]) -> Option<String> {
    first_nonempty(page.select_many(candidates))
}

fn first_nonempty(found: Vec<Vec<String>>) -> Option<String> {
    found.into_iter().find_map(|texts| {
        texts
            .into_iter()
            .map(|t| t.trim().to_string())
            .find(|t| !t.is_empty())
    })
}

/// Returns the strategies in priority order.
#[must_use]
pub fn default_strategies() -> Vec<Box<dyn ContentStrategy>> {
    vec![
        Box::new(CaptionStrategy),
        Box::new(DescriptionStrategy),
        Box::new(CommentStrategy),
        Box::new(MetadataStrategy),
    ]
}

/// Runs `strategies` in order and returns the first sufficient result.
pub async fn run_cascade(
    strategies: &[Box<dyn ContentStrategy>],
    page: &dyn PageSource,
    config: &ExtractionConfig,
    title: &str,
) -> Option<(ContentSource, String)> {
    for strategy in strategies {
        let source = strategy.source();
        match strategy.attempt(page, config, title).await {
            Some(text) if strategy.is_sufficient(&text, config) => {
                debug!(%source, chars = text.len(), "Content strategy succeeded");
                return Some((source, text.trim().to_string()));
            }
            Some(text) => {
                debug!(%source, chars = text.len(), "Content strategy came up short");
            }
            None => debug!(%source, "Content strategy found nothing"),
        }
    }
    None
}
