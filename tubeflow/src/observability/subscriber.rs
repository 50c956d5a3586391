//! Process-wide `tracing` subscriber setup.

use crate::errors::TubeflowError;
use serde::{Deserialize, Serialize};
use tracing::Subscriber;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

/// Directive used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Builds the filter from `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Builds a subscriber writing `format` lines for events passing `filter`.
///
/// Nothing is installed; use [`init_tracing`] or `tracing::subscriber::with_default`.
#[must_use]
pub fn build_subscriber(
    format: LogFormat,
    filter: EnvFilter,
) -> Box<dyn Subscriber + Send + Sync> {
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Pretty => Box::new(registry.with(tracing_subscriber::fmt::layer())),
        LogFormat::Json => Box::new(
            registry.with(tracing_subscriber::fmt::layer().json().with_current_span(true)),
        ),
    }
}

/// Installs the global subscriber, filtered by `RUST_LOG`.
///
/// Fails if a subscriber is already installed.
pub fn init_tracing(format: LogFormat) -> Result<(), TubeflowError> {
    tracing::subscriber::set_global_default(build_subscriber(format, env_filter()))
        .map_err(|e| TubeflowError::config(format!("tracing already initialized: {e}")))
}
