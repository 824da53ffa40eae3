//! # Tensors
//!
//! Named, typed tensors exchanged between the serving host and the model.
//!
//! A [`Tensor`] owns either a host buffer ([`bytes::Bytes`], reference counted)
//! or a [`DeviceHandle`] exported by a device memory capability. Fixed-width
//! element types are stored little-endian and densely packed; strings
//! ([`DataType::Bytes`]) use a 4-byte little-endian length prefix per element.
//!
//! Shapes are `i64` to match the host protocol, but a concrete tensor never
//! carries the dynamic dimension `-1`.

pub mod constant;
mod data_type;
mod element;
pub(crate) mod operations;

use bytes::Bytes;
use crate::backend::DeviceHandle;
use crate::error::{Error, Result};

pub use data_type::{DataType, ParseDataTypeError};
pub use element::Element;
pub use half::f16;
pub use operations::output_name;

/// Where a tensor's elements live.
#[derive(Debug, Clone)]
pub enum TensorStorage {
    /// Host memory
    Host(Bytes),
    /// Device memory, reachable through an exported handle
    Device(DeviceHandle),
}

/// A named tensor with a concrete shape.
#[derive(Debug, Clone)]
pub struct Tensor {
    name: String,
    data_type: DataType,
    shape: Vec<i64>,
    storage: TensorStorage,
}

impl Tensor {
    /// Wraps a raw host buffer, checking it against `data_type` and `shape`.
    pub fn from_bytes(
        name: impl Into<String>,
        data_type: DataType,
        shape: Vec<i64>,
        data: impl Into<Bytes>,
    ) -> Result<Self> {
        let name = name.into();
        let data = data.into();
        let count = element_count(&name, &shape)?;
        match data_type.element_size() {
            Some(width) => check_byte_len(&name, data.len(), count * width)?,
            None if data_type == DataType::Bytes => {
                let elements = operations::decode_bytes_elements(&name, &data)?;
                if elements.len() != count {
                    return Err(Error::tensor(
                        &name,
                        format!("shape {shape:?} needs {count} strings, buffer holds {}", elements.len()),
                    ));
                }
            }
            None => return Err(Error::tensor(&name, format!("cannot hold data of type {data_type}"))),
        }

        Ok(Self {
            name,
            data_type,
            shape,
            storage: TensorStorage::Host(data),
        })
    }

    /// Builds a host tensor from fixed-width values in row-major order.
    pub fn from_values<T: Element>(name: impl Into<String>, shape: Vec<i64>, values: &[T]) -> Result<Self> {
        Self::from_bytes(name, T::DATA_TYPE, shape, element::encode(values))
    }

    /// Builds a [`DataType::Bytes`] tensor from byte strings in row-major order.
    pub fn from_strings<S: AsRef<[u8]>>(name: impl Into<String>, shape: Vec<i64>, values: &[S]) -> Result<Self> {
        let name = name.into();
        let raw = operations::encode_bytes_elements(&name, values)?;
        Self::from_bytes(name, DataType::Bytes, shape, raw)
    }

    /// Builds a tensor that takes over a device buffer described by `handle`.
    pub fn from_device_handle(name: impl Into<String>, handle: DeviceHandle) -> Result<Self> {
        let name = name.into();
        let data_type = handle.data_type();
        let width = data_type
            .element_size()
            .ok_or_else(|| Error::tensor(&name, format!("device handles cannot carry {data_type}")))?;
        let shape = handle.shape().to_vec();
        let count = element_count(&name, &shape)?;
        check_byte_len(&name, handle.byte_len(), count * width)?;

        Ok(Self {
            name,
            data_type,
            shape,
            storage: TensorStorage::Device(handle),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn shape(&self) -> &[i64] {
        &self.shape
    }

    pub fn storage(&self) -> &TensorStorage {
        &self.storage
    }

    pub fn is_on_device(&self) -> bool {
        matches!(self.storage, TensorStorage::Device(_))
    }

    /// Number of elements described by the shape; `1` for a scalar.
    pub fn element_count(&self) -> usize {
        self.shape.iter().map(|d| *d as usize).product()
    }

    /// Returns the element buffer in host memory.
    ///
    /// Host tensors hand out a cheap clone of their buffer; device tensors
    /// copy back through their handle.
    pub fn host_bytes(&self) -> Result<Bytes> {
        match &self.storage {
            TensorStorage::Host(bytes) => Ok(bytes.clone()),
            TensorStorage::Device(handle) => handle.copy_to_host(),
        }
    }

    /// Decodes the elements as `T`, which must match the tensor's data type.
    pub fn to_values<T: Element>(&self) -> Result<Vec<T>> {
        if T::DATA_TYPE != self.data_type {
            return Err(Error::tensor(
                &self.name,
                format!("holds {}, not {}", self.data_type, T::DATA_TYPE),
            ));
        }
        Ok(element::decode(&self.host_bytes()?))
    }

    /// Decodes the elements of a [`DataType::Bytes`] tensor.
    pub fn to_strings(&self) -> Result<Vec<Vec<u8>>> {
        if self.data_type != DataType::Bytes {
            return Err(Error::tensor(&self.name, format!("holds {}, not strings", self.data_type)));
        }
        operations::decode_bytes_elements(&self.name, &self.host_bytes()?)
    }

    /// A copy of this tensor under another name, sharing the same storage.
    pub(crate) fn renamed(&self, name: String) -> Self {
        Self {
            name,
            data_type: self.data_type,
            shape: self.shape.clone(),
            storage: self.storage.clone(),
        }
    }
}

fn element_count(name: &str, shape: &[i64]) -> Result<usize> {
    shape.iter().try_fold(1usize, |acc, dim| {
        let dim = usize::try_from(*dim)
            .map_err(|_| Error::tensor(name, format!("shape {shape:?} has a negative dimension")))?;
        acc.checked_mul(dim)
            .ok_or_else(|| Error::tensor(name, format!("shape {shape:?} overflows")))
    })
}

fn check_byte_len(name: &str, actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(Error::tensor(
            name,
            format!("buffer holds {actual} bytes, shape and type need {expected}"),
        ));
    }
    Ok(())
}
