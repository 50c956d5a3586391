//! CSS selectors for the video watch page, in priority order.

/// Primary heading; its appearance means the page has rendered.
pub const PRIMARY_HEADING: &str = "h1.ytd-video-primary-info-renderer, h1[class*=\"title\"]";

/// Video title candidates.
pub const TITLE: &[&str] = &[
    "h1.ytd-video-primary-info-renderer .yt-core-attributed-string",
    "h1.ytd-video-primary-info-renderer span",
    "h1.ytd-video-primary-info-renderer",
    "h1[class*=\"title\"] span",
    "h1[class*=\"title\"]",
    ".title.style-scope.ytd-video-primary-info-renderer",
    "#container h1 span",
    "#container h1",
    "ytd-video-primary-info-renderer h1 span",
    "ytd-video-primary-info-renderer h1",
];

/// Player time displays.
pub const DURATION: &[&str] = &[
    ".ytp-time-duration",
    ".ytp-time-current",
    ".ytd-thumbnail-overlay-time-status-renderer",
    "[class*=\"duration\"]",
];

/// Caption and transcript segments.
pub const CAPTIONS: &[&str] = &[
    ".ytd-transcript-segment-renderer",
    ".ytd-transcript-body-renderer",
    "[data-params*=\"transcript\"]",
    "[aria-label*=\"transcript\"]",
    "[aria-label*=\"caption\"]",
];

/// Description region.
pub const DESCRIPTION_REGION: &str =
    "#description, #meta-contents, ytd-expandable-video-description-body-renderer";

/// Description text candidates.
pub const DESCRIPTION: &[&str] = &[
    "ytd-expandable-video-description-body-renderer #plain-snippet-text",
    "ytd-expandable-video-description-body-renderer .yt-core-attributed-string",
    "ytd-expandable-video-description-body-renderer span",
    "#description.ytd-expandable-video-description-body-renderer",
    "#description yt-formatted-string",
    "#description-text",
    "#meta-contents #description",
    ".description",
    "#watch-description-text",
    "ytd-video-secondary-info-renderer #description",
    "#description-inline-expander yt-formatted-string",
    "#description-inline-expander span",
];

/// Comment region.
pub const COMMENTS_REGION: &str = "#comments #content, ytd-comment-thread-renderer";

/// Comment text candidates.
pub const COMMENTS: &[&str] = &[
    "#content-text.ytd-comment-renderer",
    ".comment-text",
    "ytd-comment-renderer #content-text",
];

/// Channel name candidates.
pub const CHANNEL: &[&str] = &[
    "#channel-name .yt-core-attributed-string",
    "#channel-name a",
    ".ytd-channel-name a",
    "[class*=\"channel\"] a",
    "ytd-video-owner-renderer a",
];

/// View count and upload date.
pub const INFO: &[&str] = &["#info-strings yt-formatted-string", ".view-count", ".upload-date"];
