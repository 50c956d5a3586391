//! Run data for summarization.
//!
//! This module provides:
//! - The records stages produce (topics, processed topics, rankings)
//! - Extracted page content and the video description reported in results
//! - `SharedContext`, the per-run working set

mod models;
mod shared;

pub use models::{
    thumbnail_url, watch_url, ContentMeta, ContentSource, ExtractedContent, ProcessedTopic,
    QaPair, RankingEntry, Topic, VideoInfo,
};
pub use shared::SharedContext;
