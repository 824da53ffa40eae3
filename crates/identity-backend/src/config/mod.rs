//! # Model Configuration
//!
//! The configuration document the serving host and the model exchange, in
//! two stages:
//!
//! * [`AutoCompleteConfig`] - the partial configuration the model completes
//!   once per load, declaring its own inputs, outputs and policies.
//! * [`InstanceSettings`] - the immutable settings an instance resolves from
//!   the finalized configuration when it is initialized.
//!
//! Two free-form parameters are recognized, both enabled only by the exact
//! string `"True"`:
//!
//! * `decoupled` - read at load time; declares the decoupled transaction policy
//! * `request_gpu_memory` - read at initialization; enables the device memory path

mod auto_complete;
mod model_config;
mod settings;

pub use auto_complete::AutoCompleteConfig;
pub use model_config::{ModelConfig, ModelParameter, TensorSpec, TransactionPolicy};
pub use settings::{ExecutionMode, InstanceSettings};

/// Parameter that requests the decoupled transaction policy at load time
pub const DECOUPLED_PARAMETER: &str = "decoupled";

/// Parameter that requests the device memory path
pub const REQUEST_GPU_MEMORY_PARAMETER: &str = "request_gpu_memory";

/// The only parameter value treated as enabled
pub const TRUE_VALUE: &str = "True";
