//! # Decoupled Execution
//!
//! Responses are delivered through each request's
//! [`ResponseSender`](crate::communication::ResponseSender) instead of being
//! returned. Every request gets one response echoing its inputs (no
//! `output_parameters`), followed by the terminal marker.
//!
//! Requests are streamed concurrently and independently: a delivery failure
//! on one request is logged and reported without affecting the others.

mod handler;
mod report;

pub(crate) use handler::DecoupledHandler;
pub use report::{StreamFailure, StreamReport};
