use std::sync::atomic::{AtomicBool, Ordering};
use async_trait::async_trait;
use tokio::sync::mpsc;
use crate::error::{Error, Result};
use super::item_stream::ResponseStream;
use super::response::InferenceResponse;

/// What travels over a decoupled response channel
#[derive(Debug, Clone)]
pub enum StreamMessage {
    /// One response for the request
    Response(InferenceResponse),
    /// Terminal marker: the request is finished and the channel must not be
    /// written again
    Complete,
}

impl StreamMessage {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// # ResponseSender
///
/// The per-request, write-only channel a decoupled model delivers its
/// responses through.
///
/// A well-behaved model sends any number of [`StreamMessage::Response`]s and
/// then exactly one [`StreamMessage::Complete`]. The host only considers the
/// request finished once the terminal marker is accepted.
#[async_trait]
pub trait ResponseSender: Send + Sync {
    /// Delivers one message. May suspend until the host accepts it.
    async fn send(&self, message: StreamMessage) -> Result<()>;
}

/// # ChannelResponseSender
///
/// A [`ResponseSender`] backed by a Tokio unbounded channel, paired with a
/// [`ResponseStream`] on the receiving side.
///
/// Writes after the terminal marker are rejected with
/// [`Error::SenderCompleted`]; writes after the stream is dropped fail with
/// [`Error::SenderClosed`].
#[derive(Debug)]
pub struct ChannelResponseSender {
    request_id: String,
    sender: mpsc::UnboundedSender<StreamMessage>,
    completed: AtomicBool,
}

/// Creates a connected sender and stream for request `request_id`.
pub fn response_channel(request_id: impl Into<String>) -> (ChannelResponseSender, ResponseStream) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let sender = ChannelResponseSender {
        request_id: request_id.into(),
        sender,
        completed: AtomicBool::new(false),
    };
    (sender, ResponseStream::new(receiver))
}

impl ChannelResponseSender {
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Whether the terminal marker has been sent
    pub fn is_completed(&self) -> bool {
        self.completed.load(Ordering::SeqCst)
    }

    fn completed_error(&self) -> Error {
        Error::SenderCompleted {
            request_id: self.request_id.clone(),
        }
    }
}

#[async_trait]
impl ResponseSender for ChannelResponseSender {
    async fn send(&self, message: StreamMessage) -> Result<()> {
        let is_complete = message.is_complete();
        let already_completed = if is_complete {
            self.completed.swap(true, Ordering::SeqCst)
        } else {
            self.completed.load(Ordering::SeqCst)
        };
        if already_completed {
            return Err(self.completed_error());
        }

        self.sender.send(message).map_err(|_| {
            // the marker never reached the stream
            if is_complete {
                self.completed.store(false, Ordering::SeqCst);
            }
            Error::SenderClosed {
                request_id: self.request_id.clone(),
            }
        })
    }
}
