//! Observability hooks for session and turn activity.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use pobserve::{FanoutChatHooks, MetricsChatHooks, SafeChatHooks, TracingChatHooks};
//!
//! let _hooks = FanoutChatHooks::new()
//!     .with(Arc::new(SafeChatHooks::new(TracingChatHooks)))
//!     .with(Arc::new(SafeChatHooks::new(MetricsChatHooks)));
//! ```

mod fanout;
mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use fanout::FanoutChatHooks;
pub use metrics_hooks::MetricsChatHooks;
pub use safe_hooks::SafeChatHooks;
pub use tracing_hooks::TracingChatHooks;

pub mod prelude {
    pub use crate::{FanoutChatHooks, MetricsChatHooks, SafeChatHooks, TracingChatHooks};
}
