//! # Device Memory Backend
//!
//! This module provides the accelerated memory path: a pluggable capability
//! that moves tensor buffers into device memory and hands them back as
//! exported [`DeviceHandle`]s, so output tensors can be built without a host
//! round trip.
//!
//! ## Feature Flags
//!
//! - `candle`: Enables a [`DeviceMemory`] implementation on candle devices
//!
//! ## Usage
//!
//! A host that supports device memory injects an `Arc<dyn DeviceMemory>` when
//! it initializes the model. The model only uses it when the configuration
//! sets `request_gpu_memory` to `"True"`; if the parameter is set and no
//! capability was injected, execution fails instead of falling back to host
//! memory.

mod core_trait;

#[cfg_attr(docsrs, doc(cfg(feature = "candle")))]
#[cfg(feature = "candle")]
/// Candle device memory implementation.
///
/// This module is only available when the `candle` feature flag is enabled.
/// Buffers are staged as `u8` candle tensors on the chosen device.
pub mod candle;

// Re-export the core traits for convenient imports
pub use core_trait::*;


#[cfg(test)]
/// Mock device memory implementation.
///
/// Keeps buffers in host memory while pretending to be a CUDA device
pub(crate) mod mock_memory;
