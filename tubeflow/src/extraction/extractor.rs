//! Page content extraction.

use super::cascade::{default_strategies, first_text, run_cascade, ContentStrategy};
use super::config::ExtractionConfig;
use super::metadata::{self, DEFAULT_TITLE};
use super::page::PageSource;
use super::selectors;
use crate::context::{thumbnail_url, ExtractedContent};
use crate::errors::{Result, TubeflowError};
use tracing::{debug, info, warn};

/// Message carried by the extraction error when every strategy came up short.
pub const INSUFFICIENT_CONTENT: &str = "insufficient content: the video may not have captions, \
     description, or other extractable content";

/// Reads title, duration, thumbnail and body text from a watch page.
pub struct ContentExtractor {
    config: ExtractionConfig,
    strategies: Vec<Box<dyn ContentStrategy>>,
}

impl std::fmt::Debug for ContentExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentExtractor")
            .field("config", &self.config)
            .field(
                "strategies",
                &self.strategies.iter().map(|s| s.source()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new(ExtractionConfig::default())
    }
}

impl ContentExtractor {
    /// Creates an extractor with the default strategy order.
    #[must_use]
    pub fn new(config: ExtractionConfig) -> Self {
        Self {
            config,
            strategies: default_strategies(),
        }
    }

    /// Replaces the strategy list.
    #[must_use]
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn ContentStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extracts content for `video_id` from `page`.
    ///
    /// # Errors
    ///
    /// Returns an extraction error when no strategy yields enough text.
    pub async fn extract(&self, page: &dyn PageSource, video_id: &str) -> Result<ExtractedContent> {
        if !page
            .wait_for(
                selectors::PRIMARY_HEADING,
                self.config.primary_wait(),
                self.config.poll_interval(),
            )
            .await
        {
            warn!(video_id, "Primary heading did not appear, extracting anyway");
        }

        let title = resolve_title(page);
        let duration = resolve_duration(page);
        debug!(video_id, %title, duration, "Resolved video metadata");

        let (source, body) = run_cascade(&self.strategies, page, &self.config, &title)
            .await
            .ok_or_else(|| TubeflowError::extraction(INSUFFICIENT_CONTENT))?;

        info!(video_id, %source, chars = body.len(), "Extracted page content");
        Ok(ExtractedContent {
            title,
            duration,
            thumbnail_url: thumbnail_url(video_id),
            body,
            source,
        })
    }
}

/// Resolves the title: heading selectors, then the document title, then a default.
#[must_use]
pub fn resolve_title(page: &dyn PageSource) -> String {
    first_text(page, selectors::TITLE)
        .or_else(|| {
            page.document_title()
                .map(|t| metadata::strip_title_suffix(&t).to_string())
                .filter(|t| !t.is_empty())
        })
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

/// Resolves the duration in seconds from the player time displays, 0 if unknown.
#[must_use]
pub fn resolve_duration(page: &dyn PageSource) -> u64 {
    page.select_many(selectors::DURATION)
        .into_iter()
        .filter_map(|texts| texts.into_iter().next())
        .filter(|text| text.contains(':'))
        .find_map(|text| metadata::parse_duration(&text))
        .unwrap_or(0)
}
