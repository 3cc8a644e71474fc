//! Stateful multi-turn chat sessions over a stateless chat-completion API.
//!
//! This crate is the single dependency for most applications. It re-exports
//! the parley workspace crates, wires them together from configuration and
//! serves them over HTTP.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use parley::{
//!     ChatRequest, ChatResponse, ChatTransport, Choice, ChunkStream, FinishReason, Message,
//!     ProviderError, ProviderFuture, VecChunkStream,
//! };
//!
//! #[derive(Debug)]
//! struct Canned;
//!
//! impl ChatTransport for Canned {
//!     fn complete<'a>(
//!         &'a self,
//!         _request: ChatRequest,
//!     ) -> ProviderFuture<'a, Result<ChatResponse, ProviderError>> {
//!         Box::pin(async move {
//!             Ok(ChatResponse {
//!                 choices: vec![Choice {
//!                     message: Some(Message::assistant("2")),
//!                     finish_reason: Some(FinishReason::Stop),
//!                     ..Choice::default()
//!                 }],
//!                 ..ChatResponse::default()
//!             })
//!         })
//!     }
//!
//!     fn stream<'a>(
//!         &'a self,
//!         _request: ChatRequest,
//!     ) -> ProviderFuture<'a, Result<ChunkStream, ProviderError>> {
//!         Box::pin(async move { Ok(VecChunkStream::new(Vec::new()).boxed()) })
//!     }
//! }
//!
//! # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
//! let chat = parley::chat_service(Arc::new(Canned));
//! let session = chat.create_session("gpt-3.5-turbo", "", None).await.expect("session");
//! assert_eq!(chat.ask(&session.id, "1+1?").await.expect("answer"), "2");
//! # });
//! ```

mod macros;

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod runtime;
pub mod server;
pub mod util;

pub use pchat;
pub use pcommon;
pub use pmemory;
pub use pobserve;
pub use pprovider;

pub use pchat::{
    ChatError, ChatErrorKind, ChatFuture, ChatRuntimeHooks, ChatService, ChatServiceBuilder,
    DecodeStep, FragmentStream, InMemorySessionStore, NoopChatHooks, Session, SessionPatch,
    SessionStore, StreamDecoder, StreamOutcome, TurnMode, TurnRequestBuilder,
};
pub use pcommon::{BoxFuture, ParseSessionIdError, SessionId};
pub use pmemory::{
    MemoryError, MemoryErrorKind, SessionStoreConfig, SqliteSessionStore, create_session_store,
};
pub use pobserve::{FanoutChatHooks, MetricsChatHooks, SafeChatHooks, TracingChatHooks};
#[cfg(feature = "http-transport")]
pub use pprovider::HttpChatTransport;
pub use pprovider::{
    ApiError, ChatRequest, ChatResponse, ChatTransport, Choice, ChunkStream, Delta, FinishReason,
    MergeError, Message, Options, ProviderError, ProviderErrorKind, ProviderFuture, Role, Stop,
    Usage, VecChunkStream,
};

pub use cli::Cli;
pub use config::{Config, LogConfig, ServerConfig, StoreBackend, StoreConfig};
pub use error::ParleyError;
#[cfg(feature = "http-transport")]
pub use runtime::build_runtime;
pub use runtime::{
    RuntimeBundle, build_runtime_with, chat_service, chat_service_with_store, default_hooks,
};
pub use server::{API_PREFIX, ApiResult, ResultStatus, build_router};
pub use util::{
    assistant_message, prompt_patch, session, streaming_turn, system_message, turn, user_message,
};
