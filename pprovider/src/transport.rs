//! Transport contract for the remote chat-completion API and chunk framing.
//!
//! ```rust
//! use futures_util::{StreamExt, stream};
//! use pprovider::{ProviderError, decode_chunk_lines};
//!
//! # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
//! let body = stream::iter(vec![
//!     Ok::<_, ProviderError>("data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"he".as_bytes().to_vec()),
//!     Ok("llo\"}}]}\n\ndata: [DONE]\n".as_bytes().to_vec()),
//! ]);
//!
//! let chunks: Vec<_> = decode_chunk_lines(body).collect().await;
//! assert_eq!(chunks.len(), 1);
//! let chunk = chunks[0].as_ref().expect("chunk decodes");
//! let delta = chunk.choices[0].delta.as_ref().expect("delta");
//! assert_eq!(delta.content.as_deref(), Some("hello"));
//! # });
//! ```

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use async_stream::try_stream;
use futures_core::Stream;
use futures_util::StreamExt;

use crate::{ChatRequest, ChatResponse, ProviderError, ProviderFuture};

/// Base URL of the hosted chat-completion API.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Decoded chunks of one streaming response, in arrival order.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<ChatResponse, ProviderError>> + Send>>;

/// The remote chat-completion API as seen by the chat core.
///
/// `complete` returns one full response. `stream` returns only after the
/// remote side accepted the request; a non-success status is reported as
/// an error here, before any chunk is produced.
pub trait ChatTransport: Send + Sync + std::fmt::Debug {
    fn complete<'a>(
        &'a self,
        request: ChatRequest,
    ) -> ProviderFuture<'a, Result<ChatResponse, ProviderError>>;

    fn stream<'a>(&'a self, request: ChatRequest)
    -> ProviderFuture<'a, Result<ChunkStream, ProviderError>>;
}

enum Line {
    Skip,
    Done,
    Chunk(Box<ChatResponse>),
}

fn parse_line(raw: &[u8]) -> Result<Line, ProviderError> {
    let line = std::str::from_utf8(raw)
        .map_err(|error| ProviderError::protocol(format!("chunk is not valid UTF-8: {error}")))?
        .trim();

    if line.is_empty() {
        return Ok(Line::Skip);
    }

    let payload = line
        .strip_prefix("data:")
        .map(str::trim_start)
        .unwrap_or(line);
    if payload == "[DONE]" {
        return Ok(Line::Done);
    }

    let chunk: ChatResponse = serde_json::from_str(payload)
        .map_err(|error| ProviderError::protocol(format!("failed to decode chunk: {error}")))?;
    let chunk = chunk.into_result()?;

    Ok(Line::Chunk(Box::new(chunk)))
}

/// Splits a byte stream into newline-delimited chunk objects.
///
/// Blank lines separate events, an SSE `data:` prefix is accepted, and a
/// `[DONE]` line ends the stream. A line that fails to decode ends the stream
/// with a protocol error.
pub fn decode_chunk_lines<S, B>(body: S) -> ChunkStream
where
    S: Stream<Item = Result<B, ProviderError>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    let stream = try_stream! {
        let mut body = Box::pin(body);
        let mut buffer: Vec<u8> = Vec::new();
        let mut done = false;

        while let Some(bytes) = body.next().await {
            buffer.extend_from_slice(bytes?.as_ref());

            while let Some(newline) = buffer.iter().position(|byte| *byte == b'\n') {
                let line: Vec<u8> = buffer.drain(..=newline).collect();
                match parse_line(&line)? {
                    Line::Skip => {}
                    Line::Done => {
                        done = true;
                        break;
                    }
                    Line::Chunk(chunk) => yield *chunk,
                }
            }

            if done {
                break;
            }
        }

        if !done {
            if let Line::Chunk(chunk) = parse_line(&buffer)? {
                yield *chunk;
            }
        }
    };

    Box::pin(stream)
}

/// In-memory chunk stream for fakes and tests.
#[derive(Debug)]
pub struct VecChunkStream {
    chunks: VecDeque<Result<ChatResponse, ProviderError>>,
}

impl VecChunkStream {
    pub fn new(chunks: Vec<Result<ChatResponse, ProviderError>>) -> Self {
        Self {
            chunks: chunks.into(),
        }
    }

    pub fn boxed(self) -> ChunkStream {
        Box::pin(self)
    }
}

impl Stream for VecChunkStream {
    type Item = Result<ChatResponse, ProviderError>;

    fn poll_next(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<ChatResponse, ProviderError>>> {
        Poll::Ready(self.chunks.pop_front())
    }
}
