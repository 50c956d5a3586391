//! Title, duration and keyword helpers.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Title used when the page offers none.
pub const DEFAULT_TITLE: &str = "YouTube Video";

/// Channel name used when the page offers none.
pub const DEFAULT_CHANNEL: &str = "YouTube Channel";

const TITLE_SUFFIX: &str = " - YouTube";

const MAX_KEYWORDS: usize = 5;

static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "how",
        "what", "when", "where", "why", "is", "are", "was", "were",
    ]
    .into_iter()
    .collect()
});

/// Strips the site suffix from a document title.
#[must_use]
pub fn strip_title_suffix(title: &str) -> &str {
    title.trim().trim_end_matches(TITLE_SUFFIX).trim()
}

/// Parses `H:MM:SS` or `M:SS` into seconds.
///
/// Returns `None` when the text has no `:` or a part is not a number.
#[must_use]
pub fn parse_duration(text: &str) -> Option<u64> {
    let text = text.trim();
    if !text.contains(':') {
        return None;
    }
    text.split(':')
        .rev()
        .enumerate()
        .try_fold(0u64, |total, (index, part)| {
            let value: u64 = part.trim().parse().ok()?;
            let scale = 60u64.checked_pow(u32::try_from(index).ok()?)?;
            total.checked_add(value.checked_mul(scale)?)
        })
}

/// Picks up to five lowercase keywords from a title.
///
/// Keywords are words longer than three characters that are not stopwords.
#[must_use]
pub fn keywords(title: &str) -> Vec<String> {
    title
        .to_lowercase()
        .split_whitespace()
        .filter(|word| word.chars().count() > 3 && !STOPWORDS.contains(word))
        .take(MAX_KEYWORDS)
        .map(str::to_string)
        .collect()
}

/// Builds the educational framing block used when the page has no better text.
///
/// `info` holds auxiliary strings such as the view count and upload date.
#[must_use]
pub fn synthesize(title: &str, channel: Option<&str>, info: &[String]) -> String {
    let channel = channel
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CHANNEL);
    let info: String = info
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| format!("{s}. "))
        .collect();

    format!(
        "Video Title: \"{title}\". Channel: {channel}. {info}\
         This educational video discusses topics related to: {lower}. \
         Based on the title, this content likely covers educational concepts that can be \
         explained in a kid-friendly way with simple examples and easy-to-understand language. \
         The video appears to be about educational topics that children can learn from, \
         focusing on {keywords}.",
        lower = title.to_lowercase(),
        keywords = keywords(title).join(", "),
    )
}
