//! Per-stage execution reports.

use super::{StageName, StageOutcome, StageStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of how one stage of a run finished.
///
/// `fallback` is the marker callers inspect to tell a fully generated run
/// apart from a degraded one; the run itself reports success either way.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageReport {
    /// Stage name.
    pub stage: StageName,
    /// Final status.
    pub status: StageStatus,
    /// Whether fallback output was used.
    pub fallback: bool,
    /// Fallback reason or error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// When the stage started.
    pub started_at: DateTime<Utc>,
    /// When the stage ended.
    pub ended_at: DateTime<Utc>,
}

impl StageReport {
    /// Builds a report from a stage outcome.
    #[must_use]
    pub fn from_outcome<T>(
        stage: StageName,
        outcome: &StageOutcome<T>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            stage,
            status: outcome.status(),
            fallback: outcome.is_degraded(),
            reason: outcome.reason(),
            started_at,
            ended_at: Utc::now(),
        }
    }

    /// Creates a completed report with no fallback.
    #[must_use]
    pub fn completed(stage: StageName, started_at: DateTime<Utc>) -> Self {
        Self {
            stage,
            status: StageStatus::Ok,
            fallback: false,
            reason: None,
            started_at,
            ended_at: Utc::now(),
        }
    }

    /// Creates a failed report.
    #[must_use]
    pub fn failed(
        stage: StageName,
        started_at: DateTime<Utc>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            stage,
            status: StageStatus::Failed,
            fallback: false,
            reason: Some(error.into()),
            started_at,
            ended_at: Utc::now(),
        }
    }

    /// Returns the duration in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        (self.ended_at - self.started_at).num_milliseconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TubeflowError;

    #[test]
    fn test_report_from_degraded_outcome() {
        let started = Utc::now();
        let outcome = StageOutcome::degraded(vec![1], "parse failed");
        let report = StageReport::from_outcome(StageName::GenerateTopics, &outcome, started);

        assert_eq!(report.stage, StageName::GenerateTopics);
        assert_eq!(report.status, StageStatus::Degraded);
        assert!(report.fallback);
        assert_eq!(report.reason.as_deref(), Some("parse failed"));
        assert!(report.ended_at >= report.started_at);
    }

    #[test]
    fn test_report_from_fatal_outcome() {
        let outcome: StageOutcome<()> =
            StageOutcome::Fatal(TubeflowError::Validation("Invalid YouTube URL".into()));
        let report = StageReport::from_outcome(StageName::ValidateSource, &outcome, Utc::now());

        assert_eq!(report.status, StageStatus::Failed);
        assert!(!report.fallback);
        assert!(report.reason.unwrap().contains("Invalid"));
    }

    #[test]
    fn test_report_duration() {
        let started = Utc::now();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let report = StageReport::completed(StageName::ExtractContent, started);
        assert!(report.duration_ms() >= 10);
    }

    #[test]
    fn test_report_serialization() {
        let report = StageReport::failed(StageName::ExtractContent, Utc::now(), "no content");
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["stage"], "extract_content");
        assert_eq!(json["status"], "failed");
        assert_eq!(json["fallback"], false);
        assert_eq!(json["reason"], "no content");
    }
}
