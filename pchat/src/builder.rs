//! Projection of a session plus a pending user message into a wire request.
//!
//! ```rust
//! use pchat::{Session, TurnRequestBuilder};
//! use pprovider::Message;
//!
//! let session = Session::create("gpt-3.5-turbo", "be brief", None);
//! let request = TurnRequestBuilder::new(&session, Message::user("hi")).streaming(true).build();
//!
//! assert_eq!(request.messages.len(), 2);
//! assert!(request.is_streaming());
//! assert_eq!(session.messages().len(), 1);
//! assert_eq!(session.options.stream, None);
//! ```

use pprovider::{ChatRequest, Message};

use crate::Session;

#[derive(Debug)]
pub struct TurnRequestBuilder<'a> {
    session: &'a Session,
    user_message: Message,
    streaming: bool,
}

impl<'a> TurnRequestBuilder<'a> {
    pub fn new(session: &'a Session, user_message: Message) -> Self {
        Self {
            session,
            user_message,
            streaming: false,
        }
    }

    pub fn streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    /// Never touches the session. The streaming flag is decided here, on the
    /// snapshot only, whatever the stored options say.
    pub fn build(self) -> ChatRequest {
        let mut request = self.session.snapshot();
        request.messages.push(self.user_message);
        request.options.stream = self.streaming.then_some(true);

        request
    }
}
