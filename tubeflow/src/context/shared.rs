//! Per-run working set.

use super::models::{
    thumbnail_url, watch_url, ContentMeta, ExtractedContent, ProcessedTopic, RankingEntry, Topic,
    VideoInfo,
};
use uuid::Uuid;

/// Everything a single summarization run reads and writes.
///
/// Owned by exactly one run and dropped when it ends. Stages only read it;
/// the orchestrator stores each stage's output after the stage returns.
#[derive(Debug, Clone)]
pub struct SharedContext {
    /// Run identifier.
    pub run_id: Uuid,
    /// 11-character video id.
    pub video_id: String,
    /// URL the run was started with.
    pub source_url: String,
    /// Body text from extraction.
    pub raw_content: String,
    /// Title, duration and thumbnail.
    pub content_meta: ContentMeta,
    /// Topics from topic generation.
    pub topics: Vec<Topic>,
    /// Short overview from topic generation.
    pub initial_summary: String,
    /// Topics after the map stage.
    pub processed_topics: Vec<ProcessedTopic>,
    /// Cross-topic relationships from the reduce stage.
    pub topic_connections: Vec<String>,
    /// Topic importance from the reduce stage.
    pub topic_ranking: Vec<RankingEntry>,
    /// Prose summary from the compose stage.
    pub detailed_summary: String,
}

impl SharedContext {
    /// Creates an empty context for a validated video.
    #[must_use]
    pub fn new(video_id: impl Into<String>, source_url: impl Into<String>) -> Self {
        let video_id = video_id.into();
        let content_meta = ContentMeta {
            title: String::new(),
            duration: 0,
            thumbnail_url: thumbnail_url(&video_id),
        };
        Self {
            run_id: Uuid::new_v4(),
            video_id,
            source_url: source_url.into(),
            raw_content: String::new(),
            content_meta,
            topics: Vec::new(),
            initial_summary: String::new(),
            processed_topics: Vec::new(),
            topic_connections: Vec::new(),
            topic_ranking: Vec::new(),
            detailed_summary: String::new(),
        }
    }

    /// Sets the run id.
    #[must_use]
    pub fn with_run_id(mut self, run_id: Uuid) -> Self {
        self.run_id = run_id;
        self
    }

    /// Stores extraction output.
    pub fn apply_content(&mut self, content: ExtractedContent) {
        self.raw_content = content.body;
        self.content_meta = ContentMeta {
            title: content.title,
            duration: content.duration,
            thumbnail_url: if content.thumbnail_url.is_empty() {
                thumbnail_url(&self.video_id)
            } else {
                content.thumbnail_url
            },
        };
    }

    /// Returns the video title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.content_meta.title
    }

    /// Returns the video description for run results.
    #[must_use]
    pub fn video_info(&self) -> VideoInfo {
        VideoInfo {
            title: self.content_meta.title.clone(),
            duration: self.content_meta.duration,
            url: watch_url(&self.video_id),
            thumbnail_url: self.content_meta.thumbnail_url.clone(),
        }
    }

    /// Returns topic names in topic order.
    #[must_use]
    pub fn topic_names(&self) -> Vec<&str> {
        self.topics.iter().map(|t| t.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContentSource;
    use pretty_assertions::assert_eq;

    fn content() -> ExtractedContent {
        ExtractedContent {
            title: "How Rainbows Form".into(),
            duration: 252,
            thumbnail_url: String::new(),
            body: "Light bends when it enters water droplets.".into(),
            source: ContentSource::Captions,
        }
    }

    #[test]
    fn test_new_context_is_empty() {
        let ctx = SharedContext::new("abcdefghijk", "https://youtu.be/abcdefghijk");
        assert!(ctx.topics.is_empty());
        assert!(ctx.raw_content.is_empty());
        assert_eq!(
            ctx.content_meta.thumbnail_url,
            "https://img.youtube.com/vi/abcdefghijk/maxresdefault.jpg"
        );
    }

    #[test]
    fn test_apply_content_fills_meta() {
        let mut ctx = SharedContext::new("abcdefghijk", "https://youtu.be/abcdefghijk");
        ctx.apply_content(content());

        assert_eq!(ctx.title(), "How Rainbows Form");
        assert_eq!(ctx.content_meta.duration, 252);
        assert!(ctx.raw_content.starts_with("Light bends"));
        assert!(ctx.content_meta.thumbnail_url.contains("abcdefghijk"));
    }

    #[test]
    fn test_video_info_uses_canonical_url() {
        let mut ctx = SharedContext::new("abcdefghijk", "https://youtu.be/abcdefghijk");
        ctx.apply_content(content());
        let info = ctx.video_info();

        assert_eq!(info.url, "https://www.youtube.com/watch?v=abcdefghijk");
        assert_eq!(info.title, "How Rainbows Form");
    }

    #[test]
    fn test_runs_get_distinct_ids() {
        let a = SharedContext::new("abcdefghijk", "u");
        let b = SharedContext::new("abcdefghijk", "u");
        assert_ne!(a.run_id, b.run_id);
    }

    #[test]
    fn test_topic_names() {
        let mut ctx = SharedContext::new("abcdefghijk", "u");
        ctx.topics = vec![Topic::new(1, "Light", "c"), Topic::new(2, "Water", "c")];
        assert_eq!(ctx.topic_names(), vec!["Light", "Water"]);
    }
}
