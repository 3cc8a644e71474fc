//! Common imports for most parley applications.

pub use crate::{
    assistant_message, build_runtime_with, chat_service, chat_service_with_store, default_hooks,
    prompt_patch, session, streaming_turn, system_message, turn, user_message,
};
pub use crate::{parley_messages, parley_msg, parley_session};
pub use crate::{
    BoxFuture, ChatError, ChatErrorKind, ChatRequest, ChatResponse, ChatRuntimeHooks,
    ChatService, ChatServiceBuilder, ChatTransport, Config, FragmentStream,
    InMemorySessionStore, Message, Options, ParleyError, ProviderError, Role, RuntimeBundle,
    Session, SessionId, SessionPatch, SessionStore, SessionStoreConfig, StreamOutcome,
    build_router,
};
#[cfg(feature = "http-transport")]
pub use crate::{HttpChatTransport, build_runtime};
