//! Configuration types for content extraction and page fetching.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Thresholds and wait timeouts for the extraction cascade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Caption text is used when longer than this.
    #[serde(default = "default_sufficient_chars")]
    pub caption_min_chars: usize,
    /// A description element is considered when its text is longer than this.
    #[serde(default = "default_description_element_chars")]
    pub description_element_chars: usize,
    /// Description text is cut to this many characters.
    #[serde(default = "default_description_max_chars")]
    pub description_max_chars: usize,
    /// Description text is used when longer than this.
    #[serde(default = "default_sufficient_chars")]
    pub description_min_chars: usize,
    /// A comment is collected when longer than this.
    #[serde(default = "default_comment_element_chars")]
    pub comment_element_chars: usize,
    /// Maximum number of comments collected.
    #[serde(default = "default_max_comments")]
    pub max_comments: usize,
    /// Comment text is used when longer than this.
    #[serde(default = "default_sufficient_chars")]
    pub comments_min_chars: usize,
    /// Metadata text is used when longer than this.
    #[serde(default = "default_metadata_min_chars")]
    pub metadata_min_chars: usize,
    /// How long to wait for the primary heading, in milliseconds.
    #[serde(default = "default_primary_wait_ms")]
    pub primary_wait_ms: u64,
    /// How long to wait for the description region, in milliseconds.
    #[serde(default = "default_region_wait_ms")]
    pub description_wait_ms: u64,
    /// How long to wait for the comment region, in milliseconds.
    #[serde(default = "default_region_wait_ms")]
    pub comments_wait_ms: u64,
    /// Poll interval while waiting, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_sufficient_chars() -> usize {
    100
}

fn default_description_element_chars() -> usize {
    50
}

fn default_description_max_chars() -> usize {
    3000
}

fn default_comment_element_chars() -> usize {
    20
}

fn default_max_comments() -> usize {
    5
}

fn default_metadata_min_chars() -> usize {
    50
}

fn default_primary_wait_ms() -> u64 {
    10_000
}

fn default_region_wait_ms() -> u64 {
    5_000
}

fn default_poll_interval_ms() -> u64 {
    100
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            caption_min_chars: default_sufficient_chars(),
            description_element_chars: default_description_element_chars(),
            description_max_chars: default_description_max_chars(),
            description_min_chars: default_sufficient_chars(),
            comment_element_chars: default_comment_element_chars(),
            max_comments: default_max_comments(),
            comments_min_chars: default_sufficient_chars(),
            metadata_min_chars: default_metadata_min_chars(),
            primary_wait_ms: default_primary_wait_ms(),
            description_wait_ms: default_region_wait_ms(),
            comments_wait_ms: default_region_wait_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl ExtractionConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets every wait timeout to the same value.
    ///
    /// Useful for static snapshots where nothing will load later.
    #[must_use]
    pub fn with_wait_ms(mut self, wait_ms: u64) -> Self {
        self.primary_wait_ms = wait_ms;
        self.description_wait_ms = wait_ms;
        self.comments_wait_ms = wait_ms;
        self
    }

    /// Sets the poll interval.
    #[must_use]
    pub fn with_poll_interval_ms(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Sets the maximum number of comments.
    #[must_use]
    pub fn with_max_comments(mut self, max_comments: usize) -> Self {
        self.max_comments = max_comments;
        self
    }

    /// Gets the primary heading wait as a Duration.
    #[must_use]
    pub fn primary_wait(&self) -> Duration {
        Duration::from_millis(self.primary_wait_ms)
    }

    /// Gets the description wait as a Duration.
    #[must_use]
    pub fn description_wait(&self) -> Duration {
        Duration::from_millis(self.description_wait_ms)
    }

    /// Gets the comments wait as a Duration.
    #[must_use]
    pub fn comments_wait(&self) -> Duration {
        Duration::from_millis(self.comments_wait_ms)
    }

    /// Gets the poll interval as a Duration.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

/// Configuration for fetching watch pages over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Prefix the video id is appended to.
    #[serde(default = "default_watch_base_url")]
    pub watch_base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// Maximum number of redirects to follow.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Additional headers to include.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_watch_base_url() -> String {
    crate::context::watch_url("")
}

fn default_timeout() -> f64 {
    30.0
}

fn default_max_redirects() -> usize {
    5
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            watch_base_url: default_watch_base_url(),
            timeout_seconds: default_timeout(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
            headers: HashMap::new(),
        }
    }
}

impl FetchConfig {
    /// Creates a fetch configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the watch page prefix.
    #[must_use]
    pub fn with_watch_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.watch_base_url = base_url.into();
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Gets timeout as Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_seconds)
    }

    /// Returns the page URL for a video id.
    #[must_use]
    pub fn page_url(&self, video_id: &str) -> String {
        format!("{}{video_id}", self.watch_base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_defaults() {
        let config = ExtractionConfig::default();
        assert_eq!(config.caption_min_chars, 100);
        assert_eq!(config.description_element_chars, 50);
        assert_eq!(config.description_max_chars, 3000);
        assert_eq!(config.max_comments, 5);
        assert_eq!(config.metadata_min_chars, 50);
        assert_eq!(config.primary_wait(), Duration::from_secs(10));
        assert_eq!(config.comments_wait(), Duration::from_secs(5));
    }

    #[test]
    fn test_extraction_partial_deserialize() {
        let config: ExtractionConfig =
            serde_json::from_str(r#"{"max_comments": 2, "primary_wait_ms": 0}"#).unwrap();
        assert_eq!(config.max_comments, 2);
        assert_eq!(config.primary_wait_ms, 0);
        assert_eq!(config.description_max_chars, 3000);
    }

    #[test]
    fn test_with_wait_ms() {
        let config = ExtractionConfig::new().with_wait_ms(0).with_poll_interval_ms(0);
        assert_eq!(config.description_wait(), Duration::ZERO);
        assert_eq!(config.poll_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_fetch_config() {
        let config = FetchConfig::new()
            .with_timeout(5.0)
            .with_header("Accept-Language", "en-US");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(
            config.page_url("abcdefghijk"),
            "https://www.youtube.com/watch?v=abcdefghijk"
        );
        assert_eq!(config.headers.len(), 1);
    }
}
