//! Fixed-width element types that can be read from and written to a tensor
//! buffer. Buffers are little-endian, densely packed, row-major.
use super::DataType;

/// A fixed-width element with a known [`DataType`].
pub trait Element: Copy + Send + Sync + 'static {
    /// The data type this element is stored as
    const DATA_TYPE: DataType;

    /// Append the little-endian encoding of `self` to `out`
    fn write_le(self, out: &mut Vec<u8>);

    /// Decode one element from exactly `size_of::<Self>()` bytes
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_element {
    ($t:ty, $dtype:expr) => {
        impl Element for $t {
            const DATA_TYPE: DataType = $dtype;

            fn write_le(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }

            fn read_le(bytes: &[u8]) -> Self {
                let mut buf = [0u8; std::mem::size_of::<$t>()];
                buf.copy_from_slice(bytes);
                <$t>::from_le_bytes(buf)
            }
        }
    };
}

impl_element!(u8, DataType::Uint8);
impl_element!(u16, DataType::Uint16);
impl_element!(u32, DataType::Uint32);
impl_element!(u64, DataType::Uint64);
impl_element!(i8, DataType::Int8);
impl_element!(i16, DataType::Int16);
impl_element!(i32, DataType::Int32);
impl_element!(i64, DataType::Int64);
impl_element!(half::f16, DataType::Fp16);
impl_element!(f32, DataType::Fp32);
impl_element!(f64, DataType::Fp64);

impl Element for bool {
    const DATA_TYPE: DataType = DataType::Bool;

    fn write_le(self, out: &mut Vec<u8>) {
        out.push(self as u8);
    }

    fn read_le(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }
}

pub(crate) fn encode<T: Element>(values: &[T]) -> Vec<u8> {
    let width = T::DATA_TYPE.element_size().unwrap_or(0);
    let mut out = Vec::with_capacity(values.len() * width);
    for value in values {
        value.write_le(&mut out);
    }
    out
}

pub(crate) fn decode<T: Element>(bytes: &[u8]) -> Vec<T> {
    match T::DATA_TYPE.element_size() {
        Some(width) if width > 0 => bytes.chunks_exact(width).map(T::read_le).collect(),
        _ => Vec::new(),
    }
}
