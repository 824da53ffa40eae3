//! # Model Lifecycle
//!
//! The contract between a serving host and a model, in host call order:
//!
//! 1. [`ServableModel::auto_complete_config`] - once per load, before any
//!    instance exists; the model declares its inputs, outputs and policies.
//! 2. [`ServableModel::initialize`] - once per instance, with the finalized
//!    configuration and any host-provided capabilities in [`InitializeArgs`].
//! 3. [`ServableModel::execute`] - for every batch of requests.
//! 4. [`ServableModel::finalize`] - once, when the instance is unloaded.

mod handler;

pub use handler::{ExecuteOutcome, InitializeArgs, ServableModel};
