//! # Identity Backend
//!
//! A pass-through model for validating inference-serving backends: every
//! input tensor comes back unchanged as an output, so a host can check that
//! tensors of every supported element type survive the full request path.
//!
//! ## Overview
//!
//! The model runs inside a serving host and follows the host's lifecycle
//! (see [`ServableModel`]):
//!
//! - **Auto-complete** - declares one optional `{type}_input` and one
//!   `{type}_output` tensor per supported data type, plus an
//!   `output_parameters` string output. Host batching is disabled and the
//!   decoupled policy is declared when the `decoupled` parameter is `"True"`.
//! - **Initialize** - resolves the execution mode and the device memory path
//!   from the finalized configuration.
//! - **Execute** - echoes each request's inputs, renaming the first `input`
//!   in each name to `output`.
//!
//! ## Execution Modes
//!
//! ### Coupled
//!
//! One response per request, returned from the batch call. Each response
//! ends with an `output_parameters` tensor holding the request parameters as
//! a JSON object. A failure fails the whole batch.
//!
//! ### Decoupled
//!
//! Each request carries a [`ResponseSender`](communication::ResponseSender).
//! The model sends one response (without `output_parameters`) followed by the
//! terminal marker. Requests stream concurrently, and a failed delivery only
//! affects its own request.
//!
//! ## Device Memory
//!
//! When `request_gpu_memory` is `"True"`, coupled outputs are staged through
//! the [`DeviceMemory`](backend::DeviceMemory) capability the host injects at
//! initialization and exchanged as device handles.
//!
//! ## Features
//!
//! - **candle** - Enables device memory on candle devices
//!

mod coupled;
mod model;

pub mod backend;
pub mod communication;
pub mod config;
pub mod core;
pub mod decoupled;
pub mod error;
pub mod schema;
pub mod tensor;

/// Constants for client reference
pub use tensor::constant;

pub use crate::core::{ExecuteOutcome, InitializeArgs, ServableModel};
pub use model::IdentityModel;
