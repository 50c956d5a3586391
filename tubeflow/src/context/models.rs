//! Data records produced and consumed by the pipeline stages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base URL for video thumbnails.
pub const THUMBNAIL_BASE_URL: &str = "https://img.youtube.com/vi";

/// Base URL for canonical watch pages.
pub const WATCH_BASE_URL: &str = "https://www.youtube.com/watch?v=";

/// Returns the default thumbnail URL for a video id.
#[must_use]
pub fn thumbnail_url(video_id: &str) -> String {
    format!("{THUMBNAIL_BASE_URL}/{video_id}/maxresdefault.jpg")
}

/// Returns the canonical watch URL for a video id.
#[must_use]
pub fn watch_url(video_id: &str) -> String {
    format!("{WATCH_BASE_URL}{video_id}")
}

/// Which extraction strategy produced the body text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSource {
    /// Caption or transcript segments.
    Captions,
    /// The video description.
    Description,
    /// Top comments.
    Comments,
    /// Text synthesized from page metadata.
    Metadata,
}

impl fmt::Display for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Captions => write!(f, "captions"),
            Self::Description => write!(f, "description"),
            Self::Comments => write!(f, "comments"),
            Self::Metadata => write!(f, "metadata"),
        }
    }
}

/// Content read from a video page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedContent {
    /// Video title.
    pub title: String,
    /// Duration in seconds, 0 when unknown.
    pub duration: u64,
    /// Thumbnail URL.
    pub thumbnail_url: String,
    /// Body text used for summarization.
    pub body: String,
    /// Strategy that produced `body`.
    pub source: ContentSource,
}

/// Title, duration and thumbnail of the source video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMeta {
    /// Video title.
    pub title: String,
    /// Duration in seconds, 0 when unknown.
    pub duration: u64,
    /// Thumbnail URL.
    pub thumbnail_url: String,
}

/// Video description reported in run results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInfo {
    /// Video title.
    pub title: String,
    /// Duration in seconds, 0 when unknown.
    pub duration: u64,
    /// Canonical watch URL.
    pub url: String,
    /// Thumbnail URL.
    pub thumbnail_url: String,
}

impl VideoInfo {
    /// Formats the duration as `H:MM:SS` or `M:SS`, or `Unknown` when zero.
    #[must_use]
    pub fn formatted_duration(&self) -> String {
        if self.duration == 0 {
            return "Unknown".to_string();
        }
        let hours = self.duration / 3600;
        let minutes = (self.duration % 3600) / 60;
        let seconds = self.duration % 60;
        if hours > 0 {
            format!("{hours}:{minutes:02}:{seconds:02}")
        } else {
            format!("{minutes}:{seconds:02}")
        }
    }
}

/// A theme identified in the source content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Identifier, unique within a run.
    pub id: u32,
    /// Short topic name.
    pub name: String,
    /// What the topic covers.
    pub content: String,
}

impl Topic {
    /// Creates a topic.
    #[must_use]
    pub fn new(id: u32, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            content: content.into(),
        }
    }
}

/// A question a curious child might ask, with its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    /// The question.
    pub question: String,
    /// The answer.
    pub answer: String,
}

impl QaPair {
    /// Creates a question/answer pair.
    #[must_use]
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// A topic after the map stage elaborated it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedTopic {
    /// Id of the source topic.
    pub id: u32,
    /// Name of the source topic.
    pub name: String,
    /// Content of the source topic.
    pub content: String,
    /// Age-appropriate one-liner.
    pub summary: String,
    /// Longer explanation.
    pub explanation: String,
    /// Question/answer pairs.
    pub qa_pairs: Vec<QaPair>,
    /// True when the deterministic template replaced generated output.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
}

/// Importance of a topic as judged by the reduce stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    /// Referenced topic id. Not checked against the topic list.
    pub topic_id: u32,
    /// Free-form importance, normally `high`, `medium` or `low`.
    pub importance: String,
    /// Why the topic matters.
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        assert_eq!(
            thumbnail_url("dQw4w9WgXcQ"),
            "https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg"
        );
        assert_eq!(
            watch_url("dQw4w9WgXcQ"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_formatted_duration() {
        let mut info = VideoInfo {
            title: "t".into(),
            duration: 0,
            url: String::new(),
            thumbnail_url: String::new(),
        };
        assert_eq!(info.formatted_duration(), "Unknown");
        info.duration = 125;
        assert_eq!(info.formatted_duration(), "2:05");
        info.duration = 3725;
        assert_eq!(info.formatted_duration(), "1:02:05");
    }

    #[test]
    fn test_processed_topic_wire_names() {
        let topic = ProcessedTopic {
            id: 1,
            name: "Light".into(),
            content: "c".into(),
            summary: "s".into(),
            explanation: "e".into(),
            qa_pairs: vec![QaPair::new("q?", "a")],
            fallback: false,
        };
        let json = serde_json::to_value(&topic).unwrap();
        assert!(json.get("qaPairs").is_some());
        assert!(json.get("fallback").is_none());
    }

    #[test]
    fn test_ranking_entry_wire_names() {
        let entry: RankingEntry = serde_json::from_value(serde_json::json!({
            "topicId": 2,
            "importance": "high",
            "reason": "core idea"
        }))
        .unwrap();
        assert_eq!(entry.topic_id, 2);
    }

    #[test]
    fn test_content_source_display() {
        assert_eq!(ContentSource::Metadata.to_string(), "metadata");
        assert_eq!(
            serde_json::to_string(&ContentSource::Captions).unwrap(),
            r#""captions""#
        );
    }
}
