//! Run results returned across the orchestrator boundary.

use crate::context::{ProcessedTopic, RankingEntry, SharedContext, Topic, VideoInfo};
use crate::core::{Phase, PipelineState, StageName, StageReport};
use crate::errors::{ErrorKind, TubeflowError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// How far processing got, as reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingState {
    /// Topics and overview only.
    Initial,
    /// Full map-reduce output.
    Completed,
}

/// Output of an initial-phase run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialSummary {
    /// Video description.
    pub video_info: VideoInfo,
    /// The short overview.
    pub summary: String,
    /// Generated topics.
    pub topics: Vec<Topic>,
    /// Always `initial`.
    pub processing_state: ProcessingState,
}

/// Output of a detailed-phase run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedSummary {
    /// Video description.
    pub video_info: VideoInfo,
    /// The detailed prose summary.
    pub summary: String,
    /// Generated topics, kept for downloads.
    pub topics: Vec<Topic>,
    /// One elaboration per topic, in topic order.
    pub processed_topics: Vec<ProcessedTopic>,
    /// Cross-topic connections. May be empty.
    pub topic_connections: Vec<String>,
    /// Importance ranking. May be empty.
    pub topic_ranking: Vec<RankingEntry>,
    /// Always `completed`.
    pub processing_state: ProcessingState,
}

/// Phase-specific payload of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SummaryData {
    /// Full map-reduce output. Listed first so untagged decoding tries it first.
    Detailed(DetailedSummary),
    /// Topics and overview.
    Initial(InitialSummary),
}

impl SummaryData {
    /// Builds the initial-phase payload from a finished context.
    #[must_use]
    pub fn initial(ctx: &SharedContext) -> Self {
        Self::Initial(InitialSummary {
            video_info: ctx.video_info(),
            summary: ctx.initial_summary.clone(),
            topics: ctx.topics.clone(),
            processing_state: ProcessingState::Initial,
        })
    }

    /// Builds the detailed-phase payload from a finished context.
    #[must_use]
    pub fn detailed(ctx: &SharedContext) -> Self {
        Self::Detailed(DetailedSummary {
            video_info: ctx.video_info(),
            summary: ctx.detailed_summary.clone(),
            topics: ctx.topics.clone(),
            processed_topics: ctx.processed_topics.clone(),
            topic_connections: ctx.topic_connections.clone(),
            topic_ranking: ctx.topic_ranking.clone(),
            processing_state: ProcessingState::Completed,
        })
    }

    /// Returns the summary text for either phase.
    #[must_use]
    pub fn summary(&self) -> &str {
        match self {
            Self::Initial(data) => &data.summary,
            Self::Detailed(data) => &data.summary,
        }
    }

    /// Returns the topics for either phase.
    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        match self {
            Self::Initial(data) => &data.topics,
            Self::Detailed(data) => &data.topics,
        }
    }

    /// Returns the video description for either phase.
    #[must_use]
    pub fn video_info(&self) -> &VideoInfo {
        match self {
            Self::Initial(data) => &data.video_info,
            Self::Detailed(data) => &data.video_info,
        }
    }

    /// Returns the processed topics of a detailed run.
    #[must_use]
    pub fn processed_topics(&self) -> Option<&[ProcessedTopic]> {
        match self {
            Self::Initial(_) => None,
            Self::Detailed(data) => Some(&data.processed_topics),
        }
    }
}

/// Outcome of one summarization run.
///
/// A run that got past extraction is always a `Success`, even if every
/// generative stage fell back. Inspect `stages` to tell the difference.
#[derive(Debug, Clone)]
pub enum RunResult {
    /// The run produced a summary.
    Success {
        /// Requested phase.
        phase: Phase,
        /// Summary payload.
        data: Box<SummaryData>,
        /// One report per executed stage.
        stages: Vec<StageReport>,
        /// States visited, in order, ending in `Done`.
        states: Vec<PipelineState>,
    },
    /// The run terminated with a fatal error.
    Failure {
        /// The error.
        error: TubeflowError,
        /// Reports for the stages that ran, the last one failed.
        stages: Vec<StageReport>,
        /// States visited, in order, ending in `Failed`.
        states: Vec<PipelineState>,
    },
}

impl RunResult {
    /// Returns true for successful runs.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the payload of a successful run.
    #[must_use]
    pub fn data(&self) -> Option<&SummaryData> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// Returns the error of a failed run.
    #[must_use]
    pub fn error(&self) -> Option<&TubeflowError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    /// Returns the stage reports.
    #[must_use]
    pub fn stages(&self) -> &[StageReport] {
        match self {
            Self::Success { stages, .. } | Self::Failure { stages, .. } => stages,
        }
    }

    /// Returns the visited states.
    #[must_use]
    pub fn states(&self) -> &[PipelineState] {
        match self {
            Self::Success { states, .. } | Self::Failure { states, .. } => states,
        }
    }

    /// Returns the report for `stage`, if it ran.
    #[must_use]
    pub fn report(&self, stage: StageName) -> Option<&StageReport> {
        self.stages().iter().find(|r| r.stage == stage)
    }

    /// Returns true if any stage used fallback output.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.stages().iter().any(|r| r.fallback)
    }

    /// Renders the caller-facing JSON shape.
    ///
    /// Success: `{success, phase, data, stages}`. Failure: `{success, error, errorKind}`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Success {
                phase,
                data,
                stages,
                ..
            } => json!({
                "success": true,
                "phase": phase,
                "data": data,
                "stages": stages,
            }),
            Self::Failure { error, .. } => {
                let kind: ErrorKind = error.kind();
                json!({
                    "success": false,
                    "error": error.to_string(),
                    "errorKind": kind,
                })
            }
        }
    }
}
