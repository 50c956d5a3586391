//! User-facing configuration.

mod settings;

pub use settings::{AgeBand, Settings, SummaryLength, API_KEY_ENV, MAX_TOPIC_COUNT, REDACTED};
