//! HTML snapshots of watch pages and ready-made extracted content.

use crate::context::{ContentSource, ExtractedContent};

/// Title used by every fixture page that has a heading.
pub const FIXTURE_TITLE: &str = "How Volcanoes Work";

fn page(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>{FIXTURE_TITLE} - YouTube</title></head>
<body>
<div id="container">
  <h1 class="ytd-video-primary-info-renderer"><span class="yt-core-attributed-string">{FIXTURE_TITLE}</span></h1>
</div>
<div class="ytp-chrome-bottom"><span class="ytp-time-duration">4:12</span></div>
<div id="owner"><div id="channel-name"><a href="/@science">Science Kids</a></div></div>
{body}
</body>
</html>"#
    )
}

/// A page with an open transcript panel.
#[must_use]
pub fn caption_page() -> String {
    page(
        r#"<div id="transcript">
  <div class="segment ytd-transcript-segment-renderer">Volcanoes are openings in the ground where melted rock comes out.</div>
  <div class="segment ytd-transcript-segment-renderer">Deep inside the earth it is so hot that rock turns into magma.</div>
  <div class="segment ytd-transcript-segment-renderer">When pressure builds up, the magma pushes to the surface and erupts.</div>
</div>
<div id="description"><yt-formatted-string>Learn about volcanoes!</yt-formatted-string></div>"#,
    )
}

/// A page without captions whose description is long enough.
#[must_use]
pub fn description_page() -> String {
    page(
        r#"<div id="description"><yt-formatted-string>In this video we travel to Hawaii to watch lava flow into the ocean. You will learn how volcanoes form, why they erupt, and how scientists keep people safe when a volcano wakes up.</yt-formatted-string></div>"#,
    )
}

/// A page whose only substantial text is in the comments.
#[must_use]
pub fn comments_page() -> String {
    page(
        r#"<div id="description"><yt-formatted-string>Volcano video.</yt-formatted-string></div>
<ytd-comment-thread-renderer>
  <div class="comment-text">My class watched this and now we want to be volcanologists!</div>
  <div class="comment-text">Great</div>
  <div class="comment-text">The part about magma chambers was explained really clearly.</div>
  <div class="comment-text">I never knew lava could be over a thousand degrees hot.</div>
</ytd-comment-thread-renderer>"#,
    )
}

/// A page with only a document title. Resolves through the metadata strategy.
#[must_use]
pub fn bare_page() -> String {
    r"<!DOCTYPE html>
<html>
<head><title>Penguins Of Antarctica - YouTube</title></head>
<body><p>Loading...</p></body>
</html>"
        .to_string()
}

/// A page where captions, description and comments are all too short.
#[must_use]
pub fn sparse_page(title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>{title} - YouTube</title></head>
<body>
<h1 class="ytd-video-primary-info-renderer">{title}</h1>
<div class="ytd-transcript-segment-renderer">Hi there.</div>
<div id="description"><yt-formatted-string>Short description.</yt-formatted-string></div>
<ytd-comment-thread-renderer><div class="comment-text">Nice!</div></ytd-comment-thread-renderer>
<div id="info-strings"><yt-formatted-string>12K views</yt-formatted-string></div>
</body>
</html>"#
    )
}

/// Extracted content with a caption-length body.
#[must_use]
pub fn sample_content() -> ExtractedContent {
    ExtractedContent {
        title: FIXTURE_TITLE.to_string(),
        duration: 252,
        thumbnail_url: String::new(),
        body: "Volcanoes are openings in the ground where melted rock comes out. \
               Deep inside the earth it is so hot that rock turns into magma."
            .to_string(),
        source: ContentSource::Captions,
    }
}
