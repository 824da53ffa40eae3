use std::sync::Arc;
use bytes::Bytes;
use candle_core::{DeviceLocation, Tensor};
use tracing::debug;
use super::{Device, DeviceBuffer, DeviceMemory};
use crate::error::{Error, Result};

/// Stages tensor buffers on a candle device.
pub struct CandleMemory {
    device: candle_core::Device,
}

impl CandleMemory {
    pub fn new(device: candle_core::Device) -> Self {
        Self { device }
    }

    /// Opens CUDA device `ordinal`. Fails if candle was built without CUDA
    /// support or the device does not exist.
    pub fn cuda(ordinal: usize) -> Result<Self> {
        let device = candle_core::Device::new_cuda(ordinal).map_err(device_error)?;
        Ok(Self::new(device))
    }

    pub fn device(&self) -> &candle_core::Device {
        &self.device
    }
}

impl DeviceMemory for CandleMemory {
    fn name(&self) -> &'static str {
        "candle"
    }

    fn upload(&self, data: &Bytes) -> Result<Arc<dyn DeviceBuffer>> {
        let tensor = Tensor::from_slice(&data[..], data.len(), &self.device).map_err(device_error)?;
        debug!(bytes = data.len(), location = ?self.device.location(), "staged buffer on candle device");
        Ok(Arc::new(CandleBuffer { tensor }))
    }
}

/// A flat `u8` candle tensor holding one staged buffer
#[derive(Debug)]
struct CandleBuffer {
    tensor: Tensor,
}

impl DeviceBuffer for CandleBuffer {
    fn device(&self) -> Device {
        match self.tensor.device().location() {
            DeviceLocation::Cpu => Device::Cpu,
            DeviceLocation::Cuda { gpu_id } => Device::Cuda { device_id: gpu_id },
            DeviceLocation::Metal { gpu_id } => Device::Metal { device_id: gpu_id },
        }
    }

    fn byte_len(&self) -> usize {
        self.tensor.elem_count()
    }

    fn copy_to_host(&self) -> Result<Bytes> {
        let data = self.tensor.to_vec1::<u8>().map_err(device_error)?;
        Ok(Bytes::from(data))
    }
}

fn device_error(err: candle_core::Error) -> Error {
    Error::DeviceMemory(err.to_string())
}
