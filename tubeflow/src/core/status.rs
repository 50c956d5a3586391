//! Run phase, pipeline state, and stage status enums.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which tier of summary a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Topics plus a short overview. Stops after topic generation.
    #[default]
    Initial,
    /// Full map-reduce pass with per-topic explanations.
    Detailed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initial => write!(f, "initial"),
            Self::Detailed => write!(f, "detailed"),
        }
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "initial" => Ok(Self::Initial),
            "detailed" => Ok(Self::Detailed),
            other => Err(format!("unknown phase '{other}'")),
        }
    }
}

/// The named stages of a summarization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    /// URL validation.
    ValidateSource,
    /// Page content extraction.
    ExtractContent,
    /// Topic decomposition.
    GenerateTopics,
    /// Per-topic elaboration.
    ProcessTopics,
    /// Cross-topic connections and ranking.
    ReduceConnections,
    /// Final prose summary.
    ComposeSummary,
}

impl StageName {
    /// Returns true for stages that call the generative service.
    #[must_use]
    pub fn is_generative(&self) -> bool {
        matches!(
            self,
            Self::GenerateTopics
                | Self::ProcessTopics
                | Self::ReduceConnections
                | Self::ComposeSummary
        )
    }

    /// Returns the pipeline state the run is in while this stage executes.
    #[must_use]
    pub fn state(&self) -> PipelineState {
        match self {
            Self::ValidateSource => PipelineState::ValidatingSource,
            Self::ExtractContent => PipelineState::Extracting,
            Self::GenerateTopics => PipelineState::GeneratingTopics,
            Self::ProcessTopics => PipelineState::ProcessingTopicsMap,
            Self::ReduceConnections => PipelineState::ReducingConnections,
            Self::ComposeSummary => PipelineState::ComposingDetailedSummary,
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidateSource => write!(f, "validate_source"),
            Self::ExtractContent => write!(f, "extract_content"),
            Self::GenerateTopics => write!(f, "generate_topics"),
            Self::ProcessTopics => write!(f, "process_topics"),
            Self::ReduceConnections => write!(f, "reduce_connections"),
            Self::ComposeSummary => write!(f, "compose_summary"),
        }
    }
}

/// States of the orchestrator's run state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    /// Not started.
    #[default]
    Idle,
    /// Building the run context.
    Initializing,
    /// Checking the source URL.
    ValidatingSource,
    /// Reading page content.
    Extracting,
    /// Decomposing content into topics.
    GeneratingTopics,
    /// Elaborating each topic.
    ProcessingTopicsMap,
    /// Connecting and ranking topics.
    ReducingConnections,
    /// Writing the detailed summary.
    ComposingDetailedSummary,
    /// Finished successfully.
    Done,
    /// Terminated by a fatal error.
    Failed,
}

impl PipelineState {
    /// Returns true if no further transitions are possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true if `next` is a legal successor of this state.
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next == Self::Failed {
            return true;
        }
        matches!(
            (self, next),
            (Self::Idle, Self::Initializing)
                | (Self::Initializing, Self::ValidatingSource)
                | (Self::ValidatingSource, Self::Extracting)
                | (Self::Extracting, Self::GeneratingTopics)
                | (Self::GeneratingTopics, Self::Done)
                | (Self::GeneratingTopics, Self::ProcessingTopicsMap)
                | (Self::ProcessingTopicsMap, Self::ReducingConnections)
                | (Self::ReducingConnections, Self::ComposingDetailedSummary)
                | (Self::ComposingDetailedSummary, Self::Done)
        )
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Initializing => "initializing",
            Self::ValidatingSource => "validating_source",
            Self::Extracting => "extracting",
            Self::GeneratingTopics => "generating_topics",
            Self::ProcessingTopicsMap => "processing_topics_map",
            Self::ReducingConnections => "reducing_connections",
            Self::ComposingDetailedSummary => "composing_detailed_summary",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// How a stage finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Completed with generated output.
    Ok,
    /// Completed with fallback output.
    Degraded,
    /// Terminated the run.
    Failed,
}

impl StageStatus {
    /// Returns true if the run may continue past this stage.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ok | Self::Degraded)
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Degraded => write!(f, "degraded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_parse_and_display() {
        assert_eq!("initial".parse::<Phase>(), Ok(Phase::Initial));
        assert_eq!(" Detailed ".parse::<Phase>(), Ok(Phase::Detailed));
        assert!("full".parse::<Phase>().is_err());
        assert_eq!(Phase::Detailed.to_string(), "detailed");
        assert_eq!(Phase::default(), Phase::Initial);
    }

    #[test]
    fn test_stage_name_state() {
        assert_eq!(
            StageName::ProcessTopics.state(),
            PipelineState::ProcessingTopicsMap
        );
        assert!(StageName::ComposeSummary.is_generative());
        assert!(!StageName::ExtractContent.is_generative());
    }

    #[test]
    fn test_initial_path_transitions() {
        use PipelineState::*;
        let path = [Idle, Initializing, ValidatingSource, Extracting, GeneratingTopics, Done];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_detailed_path_transitions() {
        use PipelineState::*;
        let path = [
            GeneratingTopics,
            ProcessingTopicsMap,
            ReducingConnections,
            ComposingDetailedSummary,
            Done,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]));
        }
    }

    #[test]
    fn test_failed_reachable_from_non_terminal_only() {
        assert!(PipelineState::Extracting.can_transition_to(PipelineState::Failed));
        assert!(PipelineState::Idle.can_transition_to(PipelineState::Failed));
        assert!(!PipelineState::Done.can_transition_to(PipelineState::Failed));
        assert!(!PipelineState::Failed.can_transition_to(PipelineState::Failed));
    }

    #[test]
    fn test_no_skipping_ahead() {
        assert!(!PipelineState::Extracting.can_transition_to(PipelineState::ProcessingTopicsMap));
        assert!(!PipelineState::Idle.can_transition_to(PipelineState::Extracting));
    }

    #[test]
    fn test_status_serialize() {
        let json = serde_json::to_string(&StageStatus::Degraded).unwrap();
        assert_eq!(json, r#""degraded""#);
        assert!(StageStatus::Degraded.is_success());
        assert!(!StageStatus::Failed.is_success());
    }
}
