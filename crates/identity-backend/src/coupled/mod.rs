//! # Coupled Execution
//!
//! One response per request, returned from the batch call in request order.
//! Every input is echoed under its output name, followed by an
//! `output_parameters` tensor holding the request parameters as JSON.
//!
//! A failure on any request fails the whole batch; no partial results are
//! returned.

mod handler;

pub(crate) use handler::{CoupledHandler, MemoryPath};
