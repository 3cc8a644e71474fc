//! Remote chat-completion API model for parley.
//!
//! Holds the message and options types shared by every layer, the wire
//! request/response shapes, and the [`ChatTransport`] seam the chat core
//! calls through.
//!
//! ```rust
//! use pprovider::prelude::*;
//!
//! let request = ChatRequest::new("gpt-3.5-turbo", vec![Message::system("be terse"), Message::user("hi")])
//!     .with_options(Options::new().with_max_tokens(16));
//! assert!(!request.is_streaming());
//! ```

pub mod error;
#[cfg(feature = "http-transport")]
pub mod http;
pub mod message;
pub mod options;
pub mod prelude;
pub mod protocol;
pub mod transport;

pub use error::{ProviderError, ProviderErrorKind};
#[cfg(feature = "http-transport")]
pub use http::HttpChatTransport;
pub use message::{Message, Role, UnknownRole};
pub use options::{MergeError, Options, Stop};
pub use protocol::{ApiError, ChatRequest, ChatResponse, Choice, Delta, FinishReason, Usage};
pub use transport::{
    ChatTransport, ChunkStream, DEFAULT_BASE_URL, VecChunkStream, decode_chunk_lines,
};

pub type ProviderFuture<'a, T> = pcommon::BoxFuture<'a, T>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::pin::Pin;
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    use futures_core::Stream;

    #[derive(Debug)]
    struct EchoTransport;

    impl ChatTransport for EchoTransport {
        fn complete<'a>(
            &'a self,
            request: ChatRequest,
        ) -> ProviderFuture<'a, Result<ChatResponse, ProviderError>> {
            Box::pin(async move {
                let last = request
                    .messages
                    .last()
                    .cloned()
                    .ok_or_else(|| ProviderError::invalid_request("no messages"))?;
                Ok(ChatResponse {
                    model: request.model,
                    choices: vec![Choice {
                        message: Some(Message::assistant(last.content)),
                        finish_reason: Some(FinishReason::Stop),
                        ..Choice::default()
                    }],
                    ..ChatResponse::default()
                })
            })
        }

        fn stream<'a>(
            &'a self,
            _request: ChatRequest,
        ) -> ProviderFuture<'a, Result<ChunkStream, ProviderError>> {
            Box::pin(async move {
                Ok(VecChunkStream::new(vec![Ok(delta_chunk("echo"))]).boxed())
            })
        }
    }

    fn delta_chunk(content: &str) -> ChatResponse {
        ChatResponse {
            choices: vec![Choice {
                delta: Some(Delta {
                    role: None,
                    content: Some(content.to_string()),
                }),
                ..Choice::default()
            }],
            ..ChatResponse::default()
        }
    }

    #[test]
    fn transport_trait_objects_complete_requests() {
        let transport: &dyn ChatTransport = &EchoTransport;
        let request = ChatRequest::new("gpt", vec![Message::user("ping")]);

        let response = block_on(transport.complete(request)).expect("completion");
        let message = response.choices[0].message.as_ref().expect("message");
        assert_eq!(message, &Message::assistant("ping"));

        let error = block_on(transport.complete(ChatRequest::new("gpt", Vec::new())))
            .expect_err("empty history");
        assert_eq!(error.kind, ProviderErrorKind::InvalidRequest);
    }

    #[test]
    fn vec_chunk_stream_yields_chunks_in_order() {
        let mut stream = VecChunkStream::new(vec![
            Ok(delta_chunk("one")),
            Err(ProviderError::protocol("boom")),
        ])
        .boxed();
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);

        let first = stream.as_mut().poll_next(&mut cx);
        assert_eq!(first, Poll::Ready(Some(Ok(delta_chunk("one")))));

        let second = stream.as_mut().poll_next(&mut cx);
        assert_eq!(
            second,
            Poll::Ready(Some(Err(ProviderError::protocol("boom"))))
        );

        let end = stream.as_mut().poll_next(&mut cx);
        assert_eq!(end, Poll::Ready(None));

        let mut streamed = block_on(EchoTransport.stream(ChatRequest::new("gpt", Vec::new())))
            .expect("stream");
        assert_eq!(
            Pin::new(&mut streamed).poll_next(&mut cx),
            Poll::Ready(Some(Ok(delta_chunk("echo"))))
        );
    }

    fn block_on<F: Future>(future: F) -> F::Output {
        let mut future = std::pin::pin!(future);
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);

        loop {
            match future.as_mut().poll(&mut cx) {
                Poll::Ready(value) => return value,
                Poll::Pending => std::thread::yield_now(),
            }
        }
    }

    fn noop_waker() -> Waker {
        unsafe fn clone(_: *const ()) -> RawWaker {
            RawWaker::new(std::ptr::null(), &VTABLE)
        }

        unsafe fn wake(_: *const ()) {}

        unsafe fn wake_by_ref(_: *const ()) {}

        unsafe fn drop(_: *const ()) {}

        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, wake, wake_by_ref, drop);

        let raw_waker = RawWaker::new(std::ptr::null(), &VTABLE);
        unsafe { Waker::from_raw(raw_waker) }
    }
}
