//! The summarization run state machine.

use super::result::{RunResult, SummaryData};
use super::retry::{with_retry, RetryConfig, RetryError};
use super::validation;
use crate::cancellation::CancellationToken;
use crate::config::Settings;
use crate::context::{ExtractedContent, SharedContext};
use crate::core::{Phase, PipelineState, StageName, StageOutcome, StageReport};
use crate::errors::TubeflowError;
use crate::events::{self, EventSink, NoOpEventSink};
use crate::extraction::ContentChannel;
use crate::generation::GenerativeClient;
use crate::observability::run_payload;
use crate::stages::{
    ConnectionStage, DetailedSummaryStage, Stage, TopicMapStage, TopicStage,
};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, info_span, warn, Instrument, Span};
use uuid::Uuid;

/// Extracted bodies shorter than this are rejected without retrying.
pub const MIN_BODY_CHARS: usize = 30;

/// Prefix of every extraction failure reported to the caller.
pub const TRANSCRIPT_FAILED: &str = "Failed to get transcript";

/// Reported when the content channel never answered.
pub const REFRESH_PAGE: &str = "Failed to get response from the page after multiple attempts. Please refresh the page and try again.";

/// Reported when the page answered with too little text.
pub const INSUFFICIENT_BODY: &str = "Insufficient video content for summarization. This video may not have captions, description, or other extractable content. Please try a different educational video.";

/// Runs the summarization pipeline for one video URL at a time.
///
/// The orchestrator holds only configuration and collaborators. Every call to
/// [`run`](Self::run) builds its own [`SharedContext`], so concurrent runs on
/// one orchestrator never see each other's state.
///
/// # Example
///
/// ```rust,ignore
/// let orchestrator = SummarizationOrchestrator::new(client, channel, Settings::default());
/// let result = orchestrator.run("https://youtu.be/dQw4w9WgXcQ", Phase::Initial).await;
/// println!("{}", result.to_json());
/// ```
pub struct SummarizationOrchestrator {
    client: Arc<dyn GenerativeClient>,
    channel: Arc<dyn ContentChannel>,
    settings: Settings,
    retry: RetryConfig,
    events: Arc<dyn EventSink>,
}

impl fmt::Debug for SummarizationOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummarizationOrchestrator")
            .field("settings", &self.settings)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

/// Visited states and stage reports of one run.
#[derive(Debug)]
struct RunTracker {
    run_id: Uuid,
    state: PipelineState,
    states: Vec<PipelineState>,
    stages: Vec<StageReport>,
    active: Option<(StageName, DateTime<Utc>)>,
}

impl RunTracker {
    fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            state: PipelineState::Idle,
            states: vec![PipelineState::Idle],
            stages: Vec::new(),
            active: None,
        }
    }

    fn transition(&mut self, next: PipelineState) {
        if !self.state.can_transition_to(next) {
            warn!(from = %self.state, to = %next, "Unexpected state transition");
        }
        self.state = next;
        self.states.push(next);
    }

    fn begin(&mut self, stage: StageName) -> DateTime<Utc> {
        self.transition(stage.state());
        let started_at = Utc::now();
        self.active = Some((stage, started_at));
        started_at
    }

    fn finish(&mut self, report: StageReport) {
        self.active = None;
        self.stages.push(report);
    }

    /// Closes the stage that was running when the run failed.
    fn abort(&mut self, error: &TubeflowError) {
        if let Some((stage, started_at)) = self.active.take() {
            self.stages
                .push(StageReport::failed(stage, started_at, error.to_string()));
        }
    }
}

impl SummarizationOrchestrator {
    /// Creates an orchestrator with the default retry policy and no event sink.
    #[must_use]
    pub fn new(
        client: Arc<dyn GenerativeClient>,
        channel: Arc<dyn ContentChannel>,
        settings: Settings,
    ) -> Self {
        Self {
            client,
            channel,
            settings,
            retry: RetryConfig::default(),
            events: Arc::new(NoOpEventSink),
        }
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = sink;
        self
    }

    /// Sets the retry policy used for content channel reads.
    #[must_use]
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Runs the pipeline for `url`. Never fails: errors come back as
    /// [`RunResult::Failure`].
    pub async fn run(&self, url: &str, phase: Phase) -> RunResult {
        self.run_inner(url, phase, None).await
    }

    /// Runs the pipeline for `url`, stopping early if `cancel` fires.
    pub async fn run_with_cancel(
        &self,
        url: &str,
        phase: Phase,
        cancel: &CancellationToken,
    ) -> RunResult {
        self.run_inner(url, phase, Some(cancel)).await
    }

    async fn run_inner(
        &self,
        url: &str,
        phase: Phase,
        cancel: Option<&CancellationToken>,
    ) -> RunResult {
        let run_id = Uuid::new_v4();
        let span = info_span!(
            "summarize",
            run_id = %run_id,
            video_id = tracing::field::Empty,
            phase = %phase
        );

        async move {
            let mut tracker = RunTracker::new(run_id);
            info!(url, "Starting summarization run");
            self.events
                .emit(
                    events::RUN_STARTED,
                    Some(json!({"run_id": run_id.to_string(), "url": url, "phase": phase})),
                )
                .await;

            let deadline = self
                .settings
                .run_timeout_seconds
                .filter(|s| *s > 0.0)
                .and_then(|s| Duration::try_from_secs_f64(s).ok().map(|d| (s, d)));

            let outcome = {
                let execution = self.execute(url, phase, cancel, &mut tracker);
                match deadline {
                    Some((seconds, limit)) => tokio::time::timeout(limit, execution)
                        .await
                        .unwrap_or(Err(TubeflowError::Timeout { seconds })),
                    None => execution.await,
                }
            };

            self.finish(phase, tracker, outcome).await
        }
        .instrument(span)
        .await
    }

    async fn finish(
        &self,
        phase: Phase,
        mut tracker: RunTracker,
        outcome: Result<SummaryData, TubeflowError>,
    ) -> RunResult {
        match outcome {
            Ok(data) => {
                tracker.transition(PipelineState::Done);
                let degraded = tracker.stages.iter().filter(|r| r.fallback).count();
                info!(degraded_stages = degraded, "Summarization run completed");
                let payload = run_payload(tracker.run_id, phase, &tracker.stages, None);
                self.events.emit(events::RUN_COMPLETED, Some(payload)).await;
                RunResult::Success {
                    phase,
                    data: Box::new(data),
                    stages: tracker.stages,
                    states: tracker.states,
                }
            }
            Err(error) => {
                tracker.abort(&error);
                tracker.transition(PipelineState::Failed);
                warn!(error = %error, kind = %error.kind(), "Summarization run failed");
                let payload = run_payload(tracker.run_id, phase, &tracker.stages, Some(&error));
                self.events.emit(events::RUN_FAILED, Some(payload)).await;
                RunResult::Failure {
                    error,
                    stages: tracker.stages,
                    states: tracker.states,
                }
            }
        }
    }

    async fn execute(
        &self,
        url: &str,
        phase: Phase,
        cancel: Option<&CancellationToken>,
        tracker: &mut RunTracker,
    ) -> Result<SummaryData, TubeflowError> {
        tracker.transition(PipelineState::Initializing);

        check_cancelled(cancel)?;
        let started_at = self.begin(tracker, StageName::ValidateSource).await;
        let video_id = validation::video_id(url)?;
        Span::current().record("video_id", video_id.as_str());
        self.complete(tracker, StageReport::completed(StageName::ValidateSource, started_at))
            .await;

        let mut ctx = SharedContext::new(video_id, url).with_run_id(tracker.run_id);

        check_cancelled(cancel)?;
        let started_at = self.begin(tracker, StageName::ExtractContent).await;
        let content = guard(self.fetch_content(&ctx.video_id), cancel).await??;
        ctx.apply_content(content);
        self.complete(tracker, StageReport::completed(StageName::ExtractContent, started_at))
            .await;

        let topics = TopicStage::new(Arc::clone(&self.client), self.settings.topic_count());
        let output = self.run_stage(&topics, &ctx, cancel, tracker).await?;
        ctx.topics = output.topics;
        ctx.initial_summary = output.initial_summary;

        if phase == Phase::Initial {
            return Ok(SummaryData::initial(&ctx));
        }

        let age = self.settings.default_age;
        let map = TopicMapStage::new(Arc::clone(&self.client), age);
        ctx.processed_topics = self.run_stage(&map, &ctx, cancel, tracker).await?;

        let reduce = ConnectionStage::new(Arc::clone(&self.client));
        let reduced = self.run_stage(&reduce, &ctx, cancel, tracker).await?;
        ctx.topic_connections = reduced.connections;
        ctx.topic_ranking = reduced.ranking;

        let compose =
            DetailedSummaryStage::new(Arc::clone(&self.client), age, self.settings.summary_length);
        ctx.detailed_summary = self.run_stage(&compose, &ctx, cancel, tracker).await?;

        Ok(SummaryData::detailed(&ctx))
    }

    async fn begin(&self, tracker: &mut RunTracker, stage: StageName) -> DateTime<Utc> {
        let started_at = tracker.begin(stage);
        debug!(stage = %stage, "Stage started");
        self.events
            .emit(
                events::STAGE_STARTED,
                Some(json!({"run_id": tracker.run_id.to_string(), "stage": stage})),
            )
            .await;
        started_at
    }

    async fn complete(&self, tracker: &mut RunTracker, report: StageReport) {
        if report.fallback {
            warn!(
                stage = %report.stage,
                reason = report.reason.as_deref().unwrap_or_default(),
                "Stage completed with fallback"
            );
        } else {
            debug!(stage = %report.stage, duration_ms = report.duration_ms(), "Stage completed");
        }
        self.events
            .emit(
                events::STAGE_COMPLETED,
                Some(json!({
                    "run_id": tracker.run_id.to_string(),
                    "stage": report.stage,
                    "status": report.status,
                    "fallback": report.fallback,
                    "duration_ms": report.duration_ms(),
                })),
            )
            .await;
        tracker.finish(report);
    }

    async fn run_stage<S: Stage>(
        &self,
        stage: &S,
        ctx: &SharedContext,
        cancel: Option<&CancellationToken>,
        tracker: &mut RunTracker,
    ) -> Result<S::Output, TubeflowError> {
        check_cancelled(cancel)?;
        let name = stage.name();
        let started_at = self.begin(tracker, name).await;

        let outcome: StageOutcome<S::Output> = guard(stage.execute(ctx), cancel).await?;
        if let StageOutcome::Fatal(error) = outcome {
            return Err(error);
        }
        self.complete(tracker, StageReport::from_outcome(name, &outcome, started_at))
            .await;
        outcome.into_result().map(|(data, _)| data)
    }

    /// Reads page content through the channel with the retry policy.
    async fn fetch_content(&self, video_id: &str) -> Result<ExtractedContent, TubeflowError> {
        let channel = &self.channel;
        let content = with_retry(
            &self.retry,
            "request_content",
            TubeflowError::is_retryable,
            |attempt| async move {
                debug!(attempt, "Requesting page content");
                channel.request_content(video_id).await
            },
        )
        .await
        .map_err(exhausted_error)?;

        if content.body.trim().chars().count() < MIN_BODY_CHARS {
            return Err(TubeflowError::extraction(format!(
                "{TRANSCRIPT_FAILED}: {INSUFFICIENT_BODY}"
            )));
        }
        info!(
            source = %content.source,
            chars = content.body.chars().count(),
            title = %content.title,
            "Extracted page content"
        );
        Ok(content)
    }
}

fn exhausted_error(failure: RetryError<TubeflowError>) -> TubeflowError {
    let RetryError {
        error, attempts, ..
    } = failure;
    warn!(attempts, error = %error, "Content request failed");
    match error {
        TubeflowError::Transport(message) => TubeflowError::Transport(format!(
            "{TRANSCRIPT_FAILED}: {REFRESH_PAGE} ({message})"
        )),
        TubeflowError::Extraction(message) => {
            TubeflowError::Extraction(format!("{TRANSCRIPT_FAILED}: {message}"))
        }
        other => other,
    }
}

fn cancelled_error(token: &CancellationToken) -> TubeflowError {
    TubeflowError::Cancelled(token.reason().unwrap_or_else(|| "cancelled".to_string()))
}

fn check_cancelled(cancel: Option<&CancellationToken>) -> Result<(), TubeflowError> {
    match cancel {
        Some(token) if token.is_cancelled() => Err(cancelled_error(token)),
        _ => Ok(()),
    }
}

/// Races `future` against the token, if there is one.
async fn guard<F: Future>(
    future: F,
    cancel: Option<&CancellationToken>,
) -> Result<F::Output, TubeflowError> {
    match cancel {
        None => Ok(future.await),
        Some(token) => tokio::select! {
            biased;
            () = token.cancelled() => Err(cancelled_error(token)),
            output = future => Ok(output),
        },
    }
}
