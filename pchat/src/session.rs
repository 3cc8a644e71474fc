//! The session aggregate and its patch operation.
//!
//! ```rust
//! use pchat::Session;
//!
//! let session = Session::create("gpt-3.5-turbo", "you are helpful", None);
//! assert_eq!(session.messages().len(), 1);
//!
//! let empty = Session::create("gpt-3.5-turbo", "", None);
//! assert!(empty.messages().is_empty());
//! ```

use pcommon::SessionId;
use pprovider::{ChatRequest, Message, Options};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ChatError;

/// A persisted multi-turn conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub model: String,
    messages: Vec<Message>,
    pub options: Options,
}

impl Session {
    /// Starts a new conversation. A non-empty `system_prompt` seeds the history.
    pub fn create(model: impl Into<String>, system_prompt: &str, options: Option<Options>) -> Self {
        let mut messages = Vec::new();
        if !system_prompt.is_empty() {
            messages.push(Message::system(system_prompt));
        }

        Self {
            id: SessionId::generate(),
            model: model.into(),
            messages,
            options: options.unwrap_or_default(),
        }
    }

    /// Rebuilds a session from stored parts.
    pub fn restore(
        id: SessionId,
        model: impl Into<String>,
        messages: Vec<Message>,
        options: Options,
    ) -> Self {
        Self {
            id,
            model: model.into(),
            messages,
            options,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn update_options(&mut self, patch: &Options) {
        self.options.update(patch);
    }

    pub fn merge_options_json(&mut self, patch: &Value) -> Result<(), ChatError> {
        self.options.update_from_json(patch)?;
        Ok(())
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }

    /// Detached copy of the model, history and options.
    pub fn snapshot(&self) -> ChatRequest {
        ChatRequest::new(self.model.clone(), self.messages.clone())
            .with_options(self.options.clone())
    }

    /// Applies every part of `patch` or, on error, none of it.
    pub fn apply_patch(&mut self, patch: &SessionPatch) -> Result<(), ChatError> {
        let options = match &patch.options {
            Some(value) => Some(Options::from_json(value)?),
            None => None,
        };

        if let Some(model) = patch.model.as_deref().filter(|model| !model.trim().is_empty()) {
            self.set_model(model);
        }

        if let Some(prompt) = patch.prompt.as_deref().filter(|prompt| !prompt.is_empty()) {
            self.add_message(Message::system(prompt));
        }

        if let Some(options) = options {
            self.update_options(&options);
        }

        Ok(())
    }
}

/// Partial update of a session: new model, extra system prompt, options patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionPatch {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub options: Option<Value>,
}

impl SessionPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_options(mut self, options: Value) -> Self {
        self.options = Some(options);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChatErrorKind;
    use pprovider::Role;
    use serde_json::json;

    #[test]
    fn create_seeds_system_prompt_only_when_present() {
        let session = Session::create("m", "sys", None);
        assert_eq!(session.messages(), &[Message::system("sys")]);
        assert_eq!(session.messages()[0].role, Role::System);

        let session = Session::create("m", "", None);
        assert!(session.messages().is_empty());
        assert!(session.options.is_empty());
    }

    #[test]
    fn create_generates_distinct_ids() {
        let first = Session::create("m", "", None);
        let second = Session::create("m", "", None);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn snapshot_is_detached_from_session() {
        let mut session = Session::create("m", "sys", Some(Options::new().with_n(1)));
        let mut snapshot = session.snapshot();

        snapshot.messages.push(Message::user("only in snapshot"));
        snapshot.options.stream = Some(true);
        snapshot.model = "other".to_string();

        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.options.stream, None);
        assert_eq!(session.model, "m");

        session.add_message(Message::user("later"));
        assert_eq!(snapshot.messages.len(), 2);
        assert_eq!(snapshot.messages[1].content, "only in snapshot");
    }

    #[test]
    fn patch_updates_model_prompt_and_options() {
        let mut session = Session::create("m", "", Some(Options::new().with_temperature(0.1)));
        let patch = SessionPatch::new()
            .with_model("gpt-4")
            .with_prompt("answer in French")
            .with_options(json!({ "max_tokens": 100 }));

        session.apply_patch(&patch).expect("patch applies");

        assert_eq!(session.model, "gpt-4");
        assert_eq!(session.messages(), &[Message::system("answer in French")]);
        assert_eq!(session.options.temperature, Some(0.1));
        assert_eq!(session.options.max_tokens, Some(100));
    }

    #[test]
    fn empty_patch_fields_leave_session_alone() {
        let mut session = Session::create("m", "sys", None);
        let before = session.clone();

        session
            .apply_patch(&SessionPatch::new().with_model("  ").with_prompt(""))
            .expect("patch applies");

        assert_eq!(session, before);
    }

    #[test]
    fn malformed_options_patch_changes_nothing() {
        let mut session = Session::create("m", "", None);
        let before = session.clone();
        let patch = SessionPatch::new()
            .with_model("gpt-4")
            .with_prompt("new prompt")
            .with_options(json!({ "temperature": "warm" }));

        let error = session.apply_patch(&patch).expect_err("bad options");

        assert_eq!(error.kind, ChatErrorKind::Merge);
        assert_eq!(session, before);
    }
}
