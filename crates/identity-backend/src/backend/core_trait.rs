use std::fmt::Debug;
use std::sync::Arc;
use bytes::Bytes;
use crate::error::Result;
use crate::tensor::DataType;

/// Physical location of a device buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Cpu,
    Cuda { device_id: usize },
    Metal { device_id: usize },
}

/// A buffer that lives in memory owned by a [`DeviceMemory`] capability
pub trait DeviceBuffer: Debug + Send + Sync {
    /// Where the buffer lives
    fn device(&self) -> Device;

    /// Size of the buffer in bytes
    fn byte_len(&self) -> usize;

    /// Copy the buffer back into host memory
    fn copy_to_host(&self) -> Result<Bytes>;
}

/// The capability that must be injected into a model instance to exchange
/// tensors through device memory instead of host copies
pub trait DeviceMemory: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Move a host buffer into device memory
    fn upload(&self, data: &Bytes) -> Result<Arc<dyn DeviceBuffer>>;
}

/// A descriptor handed from the producer of a device buffer to its consumer.
///
/// It carries everything needed to interpret the buffer as a tensor without
/// touching host memory: the buffer itself, the element type and the shape.
/// Cloning a handle shares the buffer.
#[derive(Debug, Clone)]
pub struct DeviceHandle {
    buffer: Arc<dyn DeviceBuffer>,
    data_type: DataType,
    shape: Vec<i64>,
}

impl DeviceHandle {
    /// Export `buffer` as a tensor of `data_type` and `shape`
    pub fn export(buffer: Arc<dyn DeviceBuffer>, data_type: DataType, shape: Vec<i64>) -> Self {
        Self {
            buffer,
            data_type,
            shape,
        }
    }

    pub fn device(&self) -> Device {
        self.buffer.device()
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn shape(&self) -> &[i64] {
        &self.shape
    }

    pub fn byte_len(&self) -> usize {
        self.buffer.byte_len()
    }

    pub fn copy_to_host(&self) -> Result<Bytes> {
        self.buffer.copy_to_host()
    }
}
