//! Runtime wiring: transport, session store and hooks into a chat service.

use std::sync::Arc;

use pchat::{ChatRuntimeHooks, ChatService, SessionStore};
use pmemory::{SessionStoreConfig, create_session_store};
use pobserve::{FanoutChatHooks, MetricsChatHooks, SafeChatHooks, TracingChatHooks};
use pprovider::ChatTransport;

#[cfg(feature = "http-transport")]
use crate::config::Config;
use crate::error::ParleyError;

#[derive(Clone)]
pub struct RuntimeBundle {
    pub store: Arc<dyn SessionStore>,
    pub chat: ChatService,
}

/// Tracing and metrics hooks, each isolated from the other's panics.
pub fn default_hooks() -> Arc<dyn ChatRuntimeHooks> {
    Arc::new(
        FanoutChatHooks::new()
            .with(Arc::new(SafeChatHooks::new(TracingChatHooks)))
            .with(Arc::new(SafeChatHooks::new(MetricsChatHooks))),
    )
}

pub fn chat_service(transport: Arc<dyn ChatTransport>) -> ChatService {
    ChatService::builder(transport).build()
}

pub fn chat_service_with_store(
    transport: Arc<dyn ChatTransport>,
    store: Arc<dyn SessionStore>,
) -> ChatService {
    ChatService::builder(transport).store(store).build()
}

pub fn build_runtime_with(
    transport: Arc<dyn ChatTransport>,
    store_config: SessionStoreConfig,
) -> Result<RuntimeBundle, ParleyError> {
    let store = create_session_store(store_config)?;
    let chat = ChatService::builder(transport)
        .store(Arc::clone(&store))
        .hooks(default_hooks())
        .build();

    Ok(RuntimeBundle { store, chat })
}

/// Builds the HTTP transport and store described by `config`.
#[cfg(feature = "http-transport")]
pub fn build_runtime(config: &Config) -> Result<RuntimeBundle, ParleyError> {
    use pprovider::HttpChatTransport;

    config.validate()?;

    let transport = HttpChatTransport::with_timeout(&config.api_key, config.request_timeout())?
        .with_base_url(&config.base_url);
    tracing::info!(
        base_url = transport.base_url(),
        timeout_secs = config.request_timeout_secs,
        backend = ?config.store.backend,
        "runtime configured"
    );

    build_runtime_with(Arc::new(transport), config.session_store())
}
