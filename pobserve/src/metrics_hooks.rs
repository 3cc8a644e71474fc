//! Metrics-based hooks for session and turn activity.

use std::time::Duration;

use pchat::{ChatError, ChatRuntimeHooks, StreamOutcome, TurnMode};
use pcommon::SessionId;

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsChatHooks;

fn outcome_label(outcome: &StreamOutcome) -> &'static str {
    match outcome {
        StreamOutcome::Completed(_) => "completed",
        StreamOutcome::Failed(_) => "failed",
        StreamOutcome::Cancelled => "cancelled",
    }
}

impl ChatRuntimeHooks for MetricsChatHooks {
    fn on_session_created(&self, _session_id: &SessionId, model: &str) {
        metrics::counter!("parley_session_created_total", "model" => model.to_string())
            .increment(1);
    }

    fn on_session_updated(&self, _session_id: &SessionId) {
        metrics::counter!("parley_session_updated_total").increment(1);
    }

    fn on_turn_start(&self, _session_id: &SessionId, mode: TurnMode) {
        metrics::counter!("parley_turn_start_total", "mode" => mode.as_str()).increment(1);
    }

    fn on_turn_success(&self, _session_id: &SessionId, mode: TurnMode, elapsed: Duration) {
        metrics::counter!("parley_turn_success_total", "mode" => mode.as_str()).increment(1);
        metrics::histogram!("parley_turn_duration_seconds", "mode" => mode.as_str())
            .record(elapsed.as_secs_f64());
    }

    fn on_turn_failure(
        &self,
        _session_id: &SessionId,
        mode: TurnMode,
        error: &ChatError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "parley_turn_failure_total",
            "mode" => mode.as_str(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!("parley_turn_duration_seconds", "mode" => mode.as_str())
            .record(elapsed.as_secs_f64());
    }

    fn on_stream_finished(
        &self,
        _session_id: &SessionId,
        outcome: &StreamOutcome,
        fragments: usize,
        elapsed: Duration,
    ) {
        let outcome = outcome_label(outcome);
        metrics::counter!("parley_stream_finished_total", "outcome" => outcome).increment(1);
        metrics::histogram!("parley_stream_fragments", "outcome" => outcome)
            .record(fragments as f64);
        metrics::histogram!("parley_stream_duration_seconds", "outcome" => outcome)
            .record(elapsed.as_secs_f64());
    }
}
