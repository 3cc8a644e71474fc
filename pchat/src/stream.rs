//! Fragment stream handed to streaming callers and the task that feeds it.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use futures_core::Stream;
use futures_util::StreamExt;
use pcommon::SessionId;
use pprovider::{ChunkStream, Message};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{ChatError, ChatRuntimeHooks, DecodeStep, Session, SessionStore, StreamDecoder};

/// How a streaming turn ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamOutcome {
    /// The assembled message was appended and the session stored.
    Completed(Message),
    /// Decoding or storing failed; nothing was persisted for this reply.
    Failed(ChatError),
    /// The consumer cancelled or went away before the end of the stream.
    Cancelled,
}

impl StreamOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Single-pass sequence of text fragments for one streaming turn.
///
/// Fragments arrive through a channel of capacity 1, so the decoding task
/// stalls once one fragment is waiting. A failure is delivered as a final
/// `Err` item. Dropping the handle before the stream ends cancels the
/// decoding task, which then releases the remote connection without
/// persisting anything.
#[derive(Debug)]
pub struct FragmentStream {
    session_id: SessionId,
    receiver: mpsc::Receiver<Result<String, ChatError>>,
    cancel: CancellationToken,
    task: Option<JoinHandle<StreamOutcome>>,
    exhausted: bool,
}

impl FragmentStream {
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Stops accepting fragments and waits for the decoding task.
    ///
    /// Call this after draining the stream to learn whether the reply was
    /// stored. Calling it early abandons the remaining fragments.
    pub async fn finish(mut self) -> StreamOutcome {
        self.receiver.close();
        let Some(task) = self.task.take() else {
            return StreamOutcome::Cancelled;
        };

        match task.await {
            Ok(outcome) => outcome,
            Err(error) if error.is_cancelled() => StreamOutcome::Cancelled,
            Err(error) => {
                StreamOutcome::Failed(ChatError::protocol(format!("stream task failed: {error}")))
            }
        }
    }
}

impl Stream for FragmentStream {
    type Item = Result<String, ChatError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let polled = self.receiver.poll_recv(cx);
        if let Poll::Ready(None) = polled {
            self.exhausted = true;
        }
        polled
    }
}

impl Drop for FragmentStream {
    fn drop(&mut self) {
        // The producer closed the channel, so the reply is already settled.
        if self.exhausted {
            return;
        }
        self.cancel.cancel();
    }
}

/// Spawns the decoding task for one streaming turn.
pub(crate) fn spawn_fragment_stream(
    session: Session,
    chunks: ChunkStream,
    store: Arc<dyn SessionStore>,
    hooks: Arc<dyn ChatRuntimeHooks>,
) -> FragmentStream {
    let (sender, receiver) = mpsc::channel(1);
    let cancel = CancellationToken::new();
    let session_id = session.id;

    let producer = Producer {
        session,
        store,
        sender,
        cancel: cancel.clone(),
        fragments: 0,
    };

    let task = tokio::spawn(async move {
        let started = Instant::now();
        let (outcome, producer) = producer.run(chunks).await;

        match &outcome {
            StreamOutcome::Completed(message) => tracing::info!(
                session_id = %session_id,
                fragments = producer.fragments,
                content_len = message.content.len(),
                "stream completed"
            ),
            StreamOutcome::Failed(error) => tracing::error!(
                session_id = %session_id,
                error = %error,
                "stream failed"
            ),
            StreamOutcome::Cancelled => {
                tracing::warn!(session_id = %session_id, "stream cancelled")
            }
        }

        hooks.on_stream_finished(&session_id, &outcome, producer.fragments, started.elapsed());
        drop(producer);
        outcome
    });

    FragmentStream {
        session_id,
        receiver,
        cancel,
        task: Some(task),
        exhausted: false,
    }
}

struct Producer {
    session: Session,
    store: Arc<dyn SessionStore>,
    sender: mpsc::Sender<Result<String, ChatError>>,
    cancel: CancellationToken,
    fragments: usize,
}

impl Producer {
    async fn run(mut self, mut chunks: ChunkStream) -> (StreamOutcome, Self) {
        let outcome = self.decode(&mut chunks).await;
        drop(chunks);

        let outcome = match outcome {
            Ok(message) => self.persist(message).await,
            Err(outcome) => outcome,
        };
        (outcome, self)
    }

    async fn decode(&mut self, chunks: &mut ChunkStream) -> Result<Message, StreamOutcome> {
        let mut decoder = StreamDecoder::new();

        loop {
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(StreamOutcome::Cancelled),
                next = chunks.next() => next,
            };

            let Some(chunk) = next else {
                break;
            };

            let step = chunk
                .map_err(ChatError::from)
                .and_then(|chunk| decoder.apply(&chunk));

            match step {
                Ok(DecodeStep::Finished) => break,
                Ok(DecodeStep::Continue) => {
                    tracing::debug!(
                        session_id = %self.session.id,
                        role = ?decoder.role(),
                        "chunk"
                    );
                }
                Ok(DecodeStep::Fragment(fragment)) => {
                    tracing::debug!(
                        session_id = %self.session.id,
                        fragment_len = fragment.len(),
                        content_len = decoder.content().len(),
                        "chunk"
                    );
                    self.send(Ok(fragment)).await?;
                    self.fragments += 1;
                }
                Err(error) => return Err(self.fail(error).await),
            }
        }

        Ok(decoder.into_message())
    }

    async fn persist(&mut self, message: Message) -> StreamOutcome {
        if self.cancel.is_cancelled() {
            return StreamOutcome::Cancelled;
        }

        self.session.add_message(message.clone());
        match self.store.store(&self.session).await {
            Ok(()) => StreamOutcome::Completed(message),
            Err(error) => self.fail(error).await,
        }
    }

    async fn send(&self, item: Result<String, ChatError>) -> Result<(), StreamOutcome> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(StreamOutcome::Cancelled),
            sent = self.sender.send(item) => sent.map_err(|_| StreamOutcome::Cancelled),
        }
    }

    async fn fail(&self, error: ChatError) -> StreamOutcome {
        match self.send(Err(error.clone())).await {
            Ok(()) => StreamOutcome::Failed(error),
            Err(cancelled) => cancelled,
        }
    }
}
