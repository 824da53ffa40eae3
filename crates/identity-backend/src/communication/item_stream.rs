use std::pin::Pin;
use std::task::{Context, Poll};
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use super::response::InferenceResponse;
use super::sender::StreamMessage;

/// # ResponseStream
///
/// The receiving half of a decoupled response channel, as a `futures::Stream`
/// of [`StreamMessage`]s.
///
/// The stream yields messages in the order they were sent and ends when its
/// [`ChannelResponseSender`](super::ChannelResponseSender) is dropped. It is
/// backed by an unbounded Tokio channel, so senders never wait on it.
pub struct ResponseStream {
    /// The underlying channel receiver
    receiver: mpsc::UnboundedReceiver<StreamMessage>,
}

/// Everything a request produced, read up to its terminal marker
#[derive(Debug, Default)]
pub struct CollectedResponses {
    pub responses: Vec<InferenceResponse>,

    /// Whether the terminal marker arrived before the channel closed
    pub completed: bool,
}

impl ResponseStream {
    pub(crate) fn new(receiver: mpsc::UnboundedReceiver<StreamMessage>) -> Self {
        Self { receiver }
    }

    /// Reads responses until the terminal marker, or until the sender is
    /// dropped without sending one.
    pub async fn collect_until_complete(&mut self) -> CollectedResponses {
        let mut collected = CollectedResponses::default();
        while let Some(message) = self.next().await {
            match message {
                StreamMessage::Response(response) => collected.responses.push(response),
                StreamMessage::Complete => {
                    collected.completed = true;
                    break;
                }
            }
        }
        collected
    }
}

impl Stream for ResponseStream {
    type Item = StreamMessage;
    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.get_mut().receiver).poll_recv(cx)
    }
}
