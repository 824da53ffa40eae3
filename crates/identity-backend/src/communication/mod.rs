//! # Request and Response Plumbing
//!
//! The types exchanged between the serving host and a model:
//!
//! * [`InferenceRequest`] - named input tensors, request parameters and, for
//!   decoupled instances, a [`ResponseSender`]
//! * [`InferenceResponse`] - the named output tensors for one request
//! * [`ResponseSender`] / [`StreamMessage`] - the per-request delivery channel
//!   used in decoupled mode
//!
//! [`response_channel`] builds an in-process sender and its [`ResponseStream`],
//! which is what a host embedding the model (or a test) uses to observe
//! streamed responses.

mod item_stream;
mod request;
mod response;
mod sender;

pub use item_stream::{CollectedResponses, ResponseStream};
pub use request::{InferenceRequest, ParameterValue, RequestParameters};
pub use response::InferenceResponse;
pub use sender::{response_channel, ChannelResponseSender, ResponseSender, StreamMessage};
