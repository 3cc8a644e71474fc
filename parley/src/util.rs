//! Small convenience constructors for common types.

use crate::{ChatRequest, Message, Role, Session, SessionPatch, TurnRequestBuilder};

pub fn system_message(content: impl Into<String>) -> Message {
    Message::new(Role::System, content)
}

pub fn user_message(content: impl Into<String>) -> Message {
    Message::new(Role::User, content)
}

pub fn assistant_message(content: impl Into<String>) -> Message {
    Message::new(Role::Assistant, content)
}

pub fn session(model: impl Into<String>, system_prompt: &str) -> Session {
    Session::create(model, system_prompt, None)
}

/// The request one synchronous turn would send for `user_input`.
pub fn turn(session: &Session, user_input: impl Into<String>) -> ChatRequest {
    TurnRequestBuilder::new(session, user_message(user_input)).build()
}

pub fn streaming_turn(session: &Session, user_input: impl Into<String>) -> ChatRequest {
    TurnRequestBuilder::new(session, user_message(user_input))
        .streaming(true)
        .build()
}

pub fn prompt_patch(prompt: impl Into<String>) -> SessionPatch {
    SessionPatch::new().with_prompt(prompt)
}
