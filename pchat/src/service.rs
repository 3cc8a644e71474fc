//! Turn orchestration: session lookup, request building, the remote call and
//! committing the reply back to the store.

use std::sync::Arc;
use std::time::Instant;

use pcommon::SessionId;
use pprovider::{ChatTransport, Message, Options};

use crate::stream::spawn_fragment_stream;
use crate::{
    ChatError, ChatRuntimeHooks, FragmentStream, InMemorySessionStore, NoopChatHooks, Session,
    SessionPatch, SessionStore, TurnMode, TurnRequestBuilder,
};

#[derive(Clone)]
pub struct ChatService {
    transport: Arc<dyn ChatTransport>,
    store: Arc<dyn SessionStore>,
    hooks: Arc<dyn ChatRuntimeHooks>,
}

impl ChatService {
    pub fn new(transport: Arc<dyn ChatTransport>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            transport,
            store,
            hooks: Arc::new(NoopChatHooks),
        }
    }

    pub fn builder(transport: Arc<dyn ChatTransport>) -> ChatServiceBuilder {
        ChatServiceBuilder::new(transport)
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub async fn create_session(
        &self,
        model: &str,
        system_prompt: &str,
        options: Option<Options>,
    ) -> Result<Session, ChatError> {
        if model.trim().is_empty() {
            return Err(ChatError::validation("model must not be empty"));
        }

        let session = Session::create(model, system_prompt, options);
        self.store.store(&session).await?;

        tracing::info!(session_id = %session.id, model = %session.model, action = "create", "session created");
        self.hooks.on_session_created(&session.id, &session.model);
        Ok(session)
    }

    pub async fn update_session(
        &self,
        id: &SessionId,
        patch: &SessionPatch,
    ) -> Result<Session, ChatError> {
        let mut session = self.store.find(id).await?;
        session.apply_patch(patch)?;
        self.store.store(&session).await?;

        tracing::info!(session_id = %id, model = %session.model, action = "update", "session updated");
        self.hooks.on_session_updated(id);
        Ok(session)
    }

    pub async fn find_session(&self, id: &SessionId) -> Result<Session, ChatError> {
        self.store.find(id).await
    }

    /// Runs one synchronous turn and returns the first choice's content.
    ///
    /// The user message is stored before the remote call, so it stays in the
    /// history even when the call fails.
    pub async fn ask(&self, id: &SessionId, text: &str) -> Result<String, ChatError> {
        validate_user_text(text)?;

        let started = Instant::now();
        self.hooks.on_turn_start(id, TurnMode::Sync);

        let result = self.ask_inner(id, text).await;
        self.finish_turn(id, TurnMode::Sync, started, &result);
        result
    }

    /// Opens a streaming turn. Fails before any fragment if the remote side
    /// rejects the request; otherwise the reply is decoded on its own task.
    pub async fn ask_stream(&self, id: &SessionId, text: &str) -> Result<FragmentStream, ChatError> {
        validate_user_text(text)?;

        let started = Instant::now();
        self.hooks.on_turn_start(id, TurnMode::Stream);

        let result = self.ask_stream_inner(id, text).await;
        self.finish_turn(id, TurnMode::Stream, started, &result);
        result
    }

    async fn ask_inner(&self, id: &SessionId, text: &str) -> Result<String, ChatError> {
        let (mut session, request) = self.begin_turn(id, text, false).await?;

        let response = self.transport.complete(request).await?;
        if response.choices.is_empty() {
            return Err(ChatError::protocol("empty choices"));
        }

        let replies = response
            .choices
            .into_iter()
            .map(|choice| {
                choice.message.ok_or_else(|| {
                    ChatError::protocol(format!("choice {} carries no message", choice.index))
                })
            })
            .collect::<Result<Vec<Message>, ChatError>>()?;

        let answer = replies[0].content.clone();
        for reply in replies {
            session.add_message(reply);
        }
        self.store.store(&session).await?;

        Ok(answer)
    }

    async fn ask_stream_inner(
        &self,
        id: &SessionId,
        text: &str,
    ) -> Result<FragmentStream, ChatError> {
        let (session, request) = self.begin_turn(id, text, true).await?;
        let chunks = self.transport.stream(request).await?;

        Ok(spawn_fragment_stream(
            session,
            chunks,
            Arc::clone(&self.store),
            Arc::clone(&self.hooks),
        ))
    }

    async fn begin_turn(
        &self,
        id: &SessionId,
        text: &str,
        streaming: bool,
    ) -> Result<(Session, pprovider::ChatRequest), ChatError> {
        let mut session = self.store.find(id).await?;
        let user_message = Message::user(text);

        let request = TurnRequestBuilder::new(&session, user_message.clone())
            .streaming(streaming)
            .build();

        session.add_message(user_message);
        self.store.store(&session).await?;

        Ok((session, request))
    }

    fn finish_turn<T>(
        &self,
        id: &SessionId,
        mode: TurnMode,
        started: Instant,
        result: &Result<T, ChatError>,
    ) {
        let elapsed = started.elapsed();
        match result {
            Ok(_) => {
                tracing::info!(session_id = %id, mode = %mode, action = "ask", "turn succeeded");
                self.hooks.on_turn_success(id, mode, elapsed);
            }
            Err(error) => {
                tracing::error!(session_id = %id, mode = %mode, action = "ask", error = %error, "turn failed");
                self.hooks.on_turn_failure(id, mode, error, elapsed);
            }
        }
    }
}

fn validate_user_text(text: &str) -> Result<(), ChatError> {
    if text.trim().is_empty() {
        return Err(ChatError::validation("content must not be empty"));
    }
    Ok(())
}

pub struct ChatServiceBuilder {
    transport: Arc<dyn ChatTransport>,
    store: Option<Arc<dyn SessionStore>>,
    hooks: Option<Arc<dyn ChatRuntimeHooks>>,
}

impl ChatServiceBuilder {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            transport,
            store: None,
            hooks: None,
        }
    }

    pub fn store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn ChatRuntimeHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn build(self) -> ChatService {
        ChatService {
            transport: self.transport,
            store: self
                .store
                .unwrap_or_else(|| Arc::new(InMemorySessionStore::new())),
            hooks: self.hooks.unwrap_or_else(|| Arc::new(NoopChatHooks)),
        }
    }
}
