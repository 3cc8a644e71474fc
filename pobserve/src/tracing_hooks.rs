//! Tracing-based hooks for session and turn activity.
//!
//! ```rust
//! use pchat::ChatRuntimeHooks;
//! use pobserve::TracingChatHooks;
//!
//! fn accepts_hooks(_hooks: &dyn ChatRuntimeHooks) {}
//!
//! accepts_hooks(&TracingChatHooks);
//! ```

use std::time::Duration;

use pchat::{ChatError, ChatRuntimeHooks, StreamOutcome, TurnMode};
use pcommon::SessionId;

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingChatHooks;

impl ChatRuntimeHooks for TracingChatHooks {
    fn on_session_created(&self, session_id: &SessionId, model: &str) {
        tracing::info!(
            phase = "session",
            event = "created",
            session_id = %session_id,
            model
        );
    }

    fn on_session_updated(&self, session_id: &SessionId) {
        tracing::info!(phase = "session", event = "updated", session_id = %session_id);
    }

    fn on_turn_start(&self, session_id: &SessionId, mode: TurnMode) {
        tracing::info!(
            phase = "turn",
            event = "start",
            session_id = %session_id,
            mode = mode.as_str()
        );
    }

    fn on_turn_success(&self, session_id: &SessionId, mode: TurnMode, elapsed: Duration) {
        tracing::info!(
            phase = "turn",
            event = "success",
            session_id = %session_id,
            mode = mode.as_str(),
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_turn_failure(
        &self,
        session_id: &SessionId,
        mode: TurnMode,
        error: &ChatError,
        elapsed: Duration,
    ) {
        tracing::error!(
            phase = "turn",
            event = "failure",
            session_id = %session_id,
            mode = mode.as_str(),
            error_kind = ?error.kind,
            error = %error,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_stream_finished(
        &self,
        session_id: &SessionId,
        outcome: &StreamOutcome,
        fragments: usize,
        elapsed: Duration,
    ) {
        match outcome {
            StreamOutcome::Completed(message) => tracing::info!(
                phase = "stream",
                event = "completed",
                session_id = %session_id,
                fragments,
                content_len = message.content.len(),
                elapsed_ms = elapsed.as_millis() as u64
            ),
            StreamOutcome::Failed(error) => tracing::error!(
                phase = "stream",
                event = "failed",
                session_id = %session_id,
                fragments,
                error_kind = ?error.kind,
                error = %error,
                elapsed_ms = elapsed.as_millis() as u64
            ),
            StreamOutcome::Cancelled => tracing::warn!(
                phase = "stream",
                event = "cancelled",
                session_id = %session_id,
                fragments,
                elapsed_ms = elapsed.as_millis() as u64
            ),
        }
    }
}
