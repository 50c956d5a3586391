//! Error types for the tubeflow pipeline.
//!
//! Errors fall into two groups. Validation, extraction, transport, config,
//! cancellation and timeout errors are fatal to a run. Generation and parse
//! errors never leave a generative stage: they are absorbed by that stage's
//! fallback and only show up as a degraded stage report.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The main error type for tubeflow operations.
#[derive(Debug, Clone, Error)]
pub enum TubeflowError {
    /// The source URL is not a recognised video page.
    #[error("{0}")]
    Validation(String),

    /// No extraction strategy produced enough content.
    #[error("{0}")]
    Extraction(String),

    /// The content channel did not answer.
    #[error("{0}")]
    Transport(String),

    /// The generative service failed.
    #[error("{0}")]
    Generation(#[from] GenerationError),

    /// A generation response could not be parsed.
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The run was cancelled by its caller.
    #[error("Run cancelled: {0}")]
    Cancelled(String),

    /// The run exceeded its deadline.
    #[error("Run timed out after {seconds:.1}s")]
    Timeout {
        /// Configured deadline in seconds.
        seconds: f64,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error (settings files).
    #[error("IO error: {0}")]
    Io(String),
}

impl TubeflowError {
    /// Creates an extraction error.
    #[must_use]
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction(message.into())
    }

    /// Creates a transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns the error discriminant.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Extraction(_) => ErrorKind::Extraction,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Generation(_) => ErrorKind::Generation,
            Self::Parse(_) => ErrorKind::Parse,
            Self::Config(_) => ErrorKind::Config,
            Self::Cancelled(_) => ErrorKind::Cancelled,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Returns true if reading content again may succeed.
    ///
    /// Pages load lazily, so an extraction that came up short is retried
    /// the same way as a channel that did not answer.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Extraction(_))
    }

    /// Returns true if the error terminates a run.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Generation(_) | Self::Parse(_))
    }
}

impl From<serde_json::Error> for TubeflowError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for TubeflowError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Serializable error category reported with failed runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad input URL.
    Validation,
    /// Not enough page content.
    Extraction,
    /// Channel or network failure.
    Transport,
    /// Generative service failure.
    Generation,
    /// Malformed generation output.
    Parse,
    /// Configuration problem.
    Config,
    /// Cancelled by the caller.
    Cancelled,
    /// Deadline exceeded.
    Timeout,
    /// Serialization failure.
    Serialization,
    /// IO failure.
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validation => "validation",
            Self::Extraction => "extraction",
            Self::Transport => "transport",
            Self::Generation => "generation",
            Self::Parse => "parse",
            Self::Config => "config",
            Self::Cancelled => "cancelled",
            Self::Timeout => "timeout",
            Self::Serialization => "serialization",
            Self::Io => "io",
        };
        f.write_str(name)
    }
}

/// Errors raised by a generative client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The service answered with a non-success status.
    #[error("Gemini API error: {status} - {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// The request never produced a response.
    #[error("Gemini request failed: {0}")]
    Request(String),

    /// The response envelope could not be decoded.
    #[error("Invalid Gemini response: {0}")]
    InvalidResponse(String),

    /// The response had no candidate text.
    #[error("empty content")]
    EmptyContent,
}

impl GenerationError {
    /// Returns the HTTP status, when the service produced one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Error raised when no JSON can be recovered from a generation response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid JSON response: {message}")]
pub struct ParseError {
    /// What went wrong.
    pub message: String,
    /// Leading part of the offending text.
    pub excerpt: String,
}

impl ParseError {
    const EXCERPT_CHARS: usize = 80;

    /// Creates a parse error, keeping a short excerpt of the raw text.
    #[must_use]
    pub fn new(message: impl Into<String>, raw: &str) -> Self {
        Self {
            message: message.into(),
            excerpt: raw.chars().take(Self::EXCERPT_CHARS).collect(),
        }
    }
}

/// Result alias used across the crate.
pub type Result<T, E = TubeflowError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            TubeflowError::Validation("bad".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            TubeflowError::Timeout { seconds: 1.0 }.kind(),
            ErrorKind::Timeout
        );
        assert_eq!(
            TubeflowError::from(GenerationError::EmptyContent).kind(),
            ErrorKind::Generation
        );
    }

    #[test]
    fn test_retryable_errors() {
        assert!(TubeflowError::transport("no answer").is_retryable());
        assert!(TubeflowError::extraction("too short").is_retryable());
        assert!(!TubeflowError::Validation("bad".into()).is_retryable());
        assert!(!TubeflowError::config("missing key").is_retryable());
    }

    #[test]
    fn test_fatal_errors() {
        assert!(TubeflowError::Validation("bad".into()).is_fatal());
        assert!(!TubeflowError::from(GenerationError::EmptyContent).is_fatal());
        assert!(!TubeflowError::from(ParseError::new("nope", "garbage")).is_fatal());
    }

    #[test]
    fn test_generation_error_display() {
        let err = GenerationError::Status {
            status: 503,
            message: "overloaded".to_string(),
        };
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("overloaded"));
        assert_eq!(GenerationError::EmptyContent.to_string(), "empty content");
    }

    #[test]
    fn test_parse_error_excerpt_truncated() {
        let raw = "x".repeat(500);
        let err = ParseError::new("no json", &raw);
        assert_eq!(err.excerpt.len(), 80);
    }

    #[test]
    fn test_error_kind_serialize() {
        let json = serde_json::to_string(&ErrorKind::Transport).unwrap();
        assert_eq!(json, r#""transport""#);
        assert_eq!(ErrorKind::Cancelled.to_string(), "cancelled");
    }
}
