use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use bytes::Bytes;
use crate::backend::{Device, DeviceBuffer, DeviceMemory};
use crate::error::{Error, Result};

// A simple mock device memory for testing
pub struct MockMemory {
    uploads: AtomicUsize,
    fail: bool,
}

impl MockMemory {
    pub fn new() -> Self {
        Self { uploads: AtomicUsize::new(0), fail: false }
    }

    pub fn failing() -> Self {
        Self { uploads: AtomicUsize::new(0), fail: true }
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct MockBuffer {
    data: Bytes,
}

impl DeviceBuffer for MockBuffer {
    fn device(&self) -> Device {
        Device::Cuda { device_id: 0 }
    }

    fn byte_len(&self) -> usize {
        self.data.len()
    }

    fn copy_to_host(&self) -> Result<Bytes> {
        Ok(self.data.clone())
    }
}

impl DeviceMemory for MockMemory {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn upload(&self, data: &Bytes) -> Result<Arc<dyn DeviceBuffer>> {
        if self.fail {
            return Err(Error::DeviceMemory("mock device is out of memory".into()));
        }
        self.uploads.fetch_add(1, Ordering::SeqCst);
        // force a real copy so tests notice if the host buffer is reused
        Ok(Arc::new(MockBuffer { data: Bytes::copy_from_slice(data) }))
    }
}
