//! Streaming decoder state machine.
//!
//! Each content delta first releases the text accumulated *before* it and
//! only then appends itself, so emitted fragments trail the true running
//! content by one delta. The last delta before `stop` reaches the stored
//! message but never the fragment sequence.
//!
//! ```rust
//! use pchat::{DecodeStep, StreamDecoder};
//! use pprovider::{ChatResponse, Choice, Delta};
//!
//! fn content(text: &str) -> ChatResponse {
//!     ChatResponse {
//!         choices: vec![Choice {
//!             delta: Some(Delta { role: None, content: Some(text.to_string()) }),
//!             ..Choice::default()
//!         }],
//!         ..ChatResponse::default()
//!     }
//! }
//!
//! let mut decoder = StreamDecoder::new();
//! assert_eq!(decoder.apply(&content("a")), Ok(DecodeStep::Fragment(String::new())));
//! assert_eq!(decoder.apply(&content("b")), Ok(DecodeStep::Fragment("a".into())));
//! assert_eq!(decoder.into_message().content, "ab");
//! ```

use pprovider::{ChatResponse, FinishReason, Message, Role};

use crate::ChatError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeStep {
    /// `finish_reason: stop` was seen; later chunks must not be read.
    Finished,
    /// Text to hand to the consumer.
    Fragment(String),
    Continue,
}

#[derive(Debug, Clone, Default)]
pub struct StreamDecoder {
    role: Option<Role>,
    content: String,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, chunk: &ChatResponse) -> Result<DecodeStep, ChatError> {
        let choice = chunk
            .choices
            .first()
            .ok_or_else(|| ChatError::protocol("invalid choices"))?;

        if choice.finish_reason == Some(FinishReason::Stop) {
            return Ok(DecodeStep::Finished);
        }

        let Some(delta) = &choice.delta else {
            return Ok(DecodeStep::Continue);
        };

        if let Some(role) = delta.role.as_deref().filter(|role| !role.is_empty()) {
            let role = role
                .parse::<Role>()
                .map_err(|error| ChatError::protocol(error.to_string()))?;
            self.role = Some(role);
        }

        match delta.content.as_deref() {
            Some(content) if !content.is_empty() => {
                let fragment = self.content.clone();
                self.content.push_str(content);
                Ok(DecodeStep::Fragment(fragment))
            }
            _ => Ok(DecodeStep::Continue),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// The assembled message. Without any role delta it is an assistant message.
    pub fn into_message(self) -> Message {
        Message::new(self.role.unwrap_or(Role::Assistant), self.content)
    }
}
