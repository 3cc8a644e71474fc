//! Stateful multi-turn chat sessions over a stateless chat-completion API.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use pchat::prelude::*;
//! use pprovider::{ChatRequest, ChatResponse, Choice, ChunkStream, ProviderError, ProviderFuture};
//!
//! #[derive(Debug)]
//! struct Canned;
//!
//! impl ChatTransport for Canned {
//!     fn complete<'a>(&'a self, _request: ChatRequest) -> ProviderFuture<'a, Result<ChatResponse, ProviderError>> {
//!         Box::pin(async {
//!             Ok(ChatResponse {
//!                 choices: vec![Choice { message: Some(Message::assistant("2")), ..Choice::default() }],
//!                 ..ChatResponse::default()
//!             })
//!         })
//!     }
//!
//!     fn stream<'a>(&'a self, _request: ChatRequest) -> ProviderFuture<'a, Result<ChunkStream, ProviderError>> {
//!         Box::pin(async { Err(ProviderError::invalid_request("streaming not scripted")) })
//!     }
//! }
//!
//! # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
//! let service = ChatService::builder(Arc::new(Canned)).build();
//! let session = service.create_session("gpt-3.5-turbo", "", None).await.expect("session");
//!
//! let answer = service.ask(&session.id, "1+1?").await.expect("answer");
//! assert_eq!(answer, "2");
//! # });
//! ```

mod builder;
mod decoder;
mod error;
mod hooks;
mod service;
mod session;
mod store;
mod stream;

pub mod prelude {
    pub use crate::{
        ChatError, ChatErrorKind, ChatRuntimeHooks, ChatService, ChatServiceBuilder,
        FragmentStream, InMemorySessionStore, NoopChatHooks, Session, SessionPatch,
        SessionStore, StreamOutcome, TurnMode,
    };
    pub use pcommon::SessionId;
    pub use pprovider::{ChatTransport, Message, Options, Role};
}

pub use builder::TurnRequestBuilder;
pub use decoder::{DecodeStep, StreamDecoder};
pub use error::{ChatError, ChatErrorKind};
pub use hooks::{ChatRuntimeHooks, NoopChatHooks, TurnMode};
pub use pcommon::SessionId;
pub use service::{ChatService, ChatServiceBuilder};
pub use session::{Session, SessionPatch};
pub use store::{ChatFuture, InMemorySessionStore, SessionStore};
pub use stream::{FragmentStream, StreamOutcome};
