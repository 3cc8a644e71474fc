use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use pchat::{ChatError, ChatRuntimeHooks, StreamOutcome, TurnMode};
use pcommon::SessionId;

/// Keeps a panicking hook from taking down the turn that called it.
pub struct SafeChatHooks<H> {
    inner: H,
}

impl<H> SafeChatHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ChatRuntimeHooks for SafeChatHooks<H>
where
    H: ChatRuntimeHooks,
{
    fn on_session_created(&self, session_id: &SessionId, model: &str) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_session_created(session_id, model)
        }));
    }

    fn on_session_updated(&self, session_id: &SessionId) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_session_updated(session_id)));
    }

    fn on_turn_start(&self, session_id: &SessionId, mode: TurnMode) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_turn_start(session_id, mode)));
    }

    fn on_turn_success(&self, session_id: &SessionId, mode: TurnMode, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_turn_success(session_id, mode, elapsed)
        }));
    }

    fn on_turn_failure(
        &self,
        session_id: &SessionId,
        mode: TurnMode,
        error: &ChatError,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_turn_failure(session_id, mode, error, elapsed)
        }));
    }

    fn on_stream_finished(
        &self,
        session_id: &SessionId,
        outcome: &StreamOutcome,
        fragments: usize,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_stream_finished(session_id, outcome, fragments, elapsed)
        }));
    }
}
