//! Wide payloads summarizing a whole run in one event.

use crate::core::{Phase, StageReport, StageStatus};
use crate::errors::TubeflowError;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Builds the payload carried by the terminal run event.
///
/// Stage details keep run order. `error` is `None` for successful runs.
#[must_use]
pub fn run_payload(
    run_id: Uuid,
    phase: Phase,
    stages: &[StageReport],
    error: Option<&TubeflowError>,
) -> Value {
    let mut stage_counts: BTreeMap<String, u32> = BTreeMap::new();
    for report in stages {
        *stage_counts.entry(report.status.to_string()).or_insert(0) += 1;
    }
    let details: Vec<Value> = stages
        .iter()
        .map(|r| {
            json!({
                "stage": r.stage,
                "status": r.status,
                "fallback": r.fallback,
                "duration_ms": r.duration_ms(),
            })
        })
        .collect();

    let mut payload = json!({
        "run_id": run_id.to_string(),
        "phase": phase,
        "status": if error.is_some() { "failed" } else { "completed" },
        "degraded_stages": stages.iter().filter(|r| r.status == StageStatus::Degraded).count(),
        "stage_counts": stage_counts,
        "stage_details": details,
    });
    if let Some(error) = error {
        payload["error"] = json!(error.to_string());
        payload["kind"] = json!(error.kind());
    }
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StageName;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn reports() -> Vec<StageReport> {
        let now = Utc::now();
        let mut degraded = StageReport::completed(StageName::ProcessTopics, now);
        degraded.status = StageStatus::Degraded;
        degraded.fallback = true;
        vec![
            StageReport::completed(StageName::ValidateSource, now),
            StageReport::completed(StageName::ExtractContent, now),
            degraded,
        ]
    }

    #[test]
    fn test_completed_payload() {
        let payload = run_payload(Uuid::nil(), Phase::Detailed, &reports(), None);

        assert_eq!(payload["status"], "completed");
        assert_eq!(payload["phase"], "detailed");
        assert_eq!(payload["degraded_stages"], 1);
        assert_eq!(payload["stage_counts"], json!({"degraded": 1, "ok": 2}));
        assert_eq!(payload["stage_details"][2]["stage"], "process_topics");
        assert!(payload.get("error").is_none());
    }

    #[test]
    fn test_failed_payload_carries_error() {
        let error = TubeflowError::transport("no tab");
        let payload = run_payload(Uuid::nil(), Phase::Initial, &[], Some(&error));

        assert_eq!(payload["status"], "failed");
        assert_eq!(payload["kind"], "transport");
        assert_eq!(payload["stage_details"], json!([]));
    }
}
