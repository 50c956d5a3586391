//! Source URL validation.

use crate::errors::TubeflowError;
use regex::Regex;
use std::sync::LazyLock;

/// Message returned for URLs that do not point at a single video.
pub const INVALID_URL: &str =
    "Invalid YouTube URL. Please make sure you're on a YouTube video page.";

static VIDEO_URL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^https?://(www\.)?(youtube\.com/watch\?v=|youtu\.be/)([a-zA-Z0-9_-]{11})").ok()
});

/// Returns the 11-character video id in `url`.
///
/// Anything after the id (extra query parameters, fragments) is ignored.
///
/// # Errors
///
/// Returns a validation error if `url` is not a watch or short-link URL.
pub fn video_id(url: &str) -> Result<String, TubeflowError> {
    VIDEO_URL
        .as_ref()
        .and_then(|re| re.captures(url.trim()))
        .and_then(|caps| caps.get(3))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| TubeflowError::Validation(INVALID_URL.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_url() {
        assert_eq!(
            video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_short_and_plain_host_urls() {
        assert_eq!(video_id("https://youtu.be/dQw4w9WgXcQ").unwrap(), "dQw4w9WgXcQ");
        assert_eq!(
            video_id("http://youtube.com/watch?v=a_b-c1234XY&t=42s").unwrap(),
            "a_b-c1234XY"
        );
    }

    #[test]
    fn test_rejects_other_hosts_and_short_ids() {
        for url in [
            "https://example.com/video",
            "https://www.youtube.com/watch?v=short",
            "https://www.youtube.com/channel/UC123",
            "youtube.com/watch?v=dQw4w9WgXcQ",
            "",
        ] {
            let err = video_id(url).unwrap_err();
            assert!(matches!(err, TubeflowError::Validation(ref m) if m == INVALID_URL), "{url}");
        }
    }
}
