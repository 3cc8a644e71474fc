use std::sync::Arc;
use std::time::Duration;

use pchat::{ChatError, ChatRuntimeHooks, StreamOutcome, TurnMode};
use pcommon::SessionId;

/// Dispatches every callback to each registered hook, in registration order.
#[derive(Clone, Default)]
pub struct FanoutChatHooks {
    hooks: Vec<Arc<dyn ChatRuntimeHooks>>,
}

impl FanoutChatHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, hooks: Arc<dyn ChatRuntimeHooks>) -> Self {
        self.hooks.push(hooks);
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl ChatRuntimeHooks for FanoutChatHooks {
    fn on_session_created(&self, session_id: &SessionId, model: &str) {
        for hooks in &self.hooks {
            hooks.on_session_created(session_id, model);
        }
    }

    fn on_session_updated(&self, session_id: &SessionId) {
        for hooks in &self.hooks {
            hooks.on_session_updated(session_id);
        }
    }

    fn on_turn_start(&self, session_id: &SessionId, mode: TurnMode) {
        for hooks in &self.hooks {
            hooks.on_turn_start(session_id, mode);
        }
    }

    fn on_turn_success(&self, session_id: &SessionId, mode: TurnMode, elapsed: Duration) {
        for hooks in &self.hooks {
            hooks.on_turn_success(session_id, mode, elapsed);
        }
    }

    fn on_turn_failure(
        &self,
        session_id: &SessionId,
        mode: TurnMode,
        error: &ChatError,
        elapsed: Duration,
    ) {
        for hooks in &self.hooks {
            hooks.on_turn_failure(session_id, mode, error, elapsed);
        }
    }

    fn on_stream_finished(
        &self,
        session_id: &SessionId,
        outcome: &StreamOutcome,
        fragments: usize,
        elapsed: Duration,
    ) {
        for hooks in &self.hooks {
            hooks.on_stream_finished(session_id, outcome, fragments, elapsed);
        }
    }
}
