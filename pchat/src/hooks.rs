//! Runtime hook contracts for observing session and turn activity.
//!
//! ```rust
//! use pchat::{ChatRuntimeHooks, NoopChatHooks};
//!
//! fn accepts_hooks(_hooks: &dyn ChatRuntimeHooks) {}
//!
//! accepts_hooks(&NoopChatHooks);
//! ```

use std::fmt::{Display, Formatter};
use std::time::Duration;

use pcommon::SessionId;

use crate::{ChatError, StreamOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnMode {
    Sync,
    Stream,
}

impl TurnMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sync => "sync",
            Self::Stream => "stream",
        }
    }
}

impl Display for TurnMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait ChatRuntimeHooks: Send + Sync {
    fn on_session_created(&self, _session_id: &SessionId, _model: &str) {}

    fn on_session_updated(&self, _session_id: &SessionId) {}

    fn on_turn_start(&self, _session_id: &SessionId, _mode: TurnMode) {}

    /// For streaming turns this fires once the remote side accepted the request.
    fn on_turn_success(&self, _session_id: &SessionId, _mode: TurnMode, _elapsed: Duration) {}

    fn on_turn_failure(
        &self,
        _session_id: &SessionId,
        _mode: TurnMode,
        _error: &ChatError,
        _elapsed: Duration,
    ) {
    }

    fn on_stream_finished(
        &self,
        _session_id: &SessionId,
        _outcome: &StreamOutcome,
        _fragments: usize,
        _elapsed: Duration,
    ) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopChatHooks;

impl ChatRuntimeHooks for NoopChatHooks {}
