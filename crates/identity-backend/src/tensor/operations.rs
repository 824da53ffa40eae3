use bytes::Bytes;
use crate::backend::{DeviceHandle, DeviceMemory};
use crate::error::{Error, Result};
use super::constant::{BYTES_LENGTH_PREFIX, INPUT_TOKEN, OUTPUT_TOKEN};
use super::{DataType, Tensor};

/// Derives an output tensor name from an input tensor name.
///
/// The first case-sensitive occurrence of `input` is replaced by `output`;
/// names without it are returned unchanged.
///
/// ```
/// use identity_backend::tensor::output_name;
///
/// assert_eq!(output_name("fp32_input"), "fp32_output");
/// assert_eq!(output_name("input_input"), "output_input");
/// assert_eq!(output_name("INPUT0"), "INPUT0");
/// ```
pub fn output_name(input_name: &str) -> String {
    input_name.replacen(INPUT_TOKEN, OUTPUT_TOKEN, 1)
}

/// Produces the output counterpart of `input` sharing the same host buffer.
///
/// The storage is reference counted, so this never copies element data.
pub(crate) fn pass_through(input: &Tensor) -> Tensor {
    input.renamed(output_name(input.name()))
}

/// Produces the output counterpart of `input` by staging its buffer in device
/// memory and rebuilding the tensor from the exported handle.
///
/// Variable-length string tensors have no device layout and are rejected.
pub(crate) fn pass_through_device(input: &Tensor, memory: &dyn DeviceMemory) -> Result<Tensor> {
    if input.data_type() == DataType::Bytes {
        return Err(Error::DeviceMemory(format!(
            "tensor '{}' holds variable-length strings, which cannot be exchanged through a device handle",
            input.name()
        )));
    }

    let host = input.host_bytes()?;
    let buffer = memory.upload(&host)?;
    let handle = DeviceHandle::export(buffer, input.data_type(), input.shape().to_vec());
    Tensor::from_device_handle(output_name(input.name()), handle)
}

/// Serializes byte-string elements with a 4-byte little-endian length prefix
/// in front of each element.
pub(crate) fn encode_bytes_elements<S: AsRef<[u8]>>(name: &str, elements: &[S]) -> Result<Bytes> {
    let total: usize = elements
        .iter()
        .map(|e| e.as_ref().len() + BYTES_LENGTH_PREFIX)
        .sum();
    let mut raw = Vec::with_capacity(total);
    for element in elements {
        let element = element.as_ref();
        let len = u32::try_from(element.len())
            .map_err(|_| Error::tensor(name, "string element longer than u32::MAX bytes"))?;
        raw.extend_from_slice(&len.to_le_bytes());
        raw.extend_from_slice(element);
    }
    Ok(Bytes::from(raw))
}

/// Splits a length-prefixed BYTES buffer back into its elements.
pub(crate) fn decode_bytes_elements(name: &str, data: &[u8]) -> Result<Vec<Vec<u8>>> {
    let mut elements = Vec::new();
    let mut offset = 0;
    while offset < data.len() {
        let prefix_end = offset + BYTES_LENGTH_PREFIX;
        let prefix = data
            .get(offset..prefix_end)
            .ok_or_else(|| Error::tensor(name, "truncated string length prefix"))?;
        let len = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;
        let element = data
            .get(prefix_end..prefix_end + len)
            .ok_or_else(|| Error::tensor(name, "string element runs past the end of the buffer"))?;
        elements.push(element.to_vec());
        offset = prefix_end + len;
    }
    Ok(elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock_memory::MockMemory;

    #[test]
    fn test_output_name_replaces_first_occurrence_only() {
        assert_eq!(output_name("fp32_input"), "fp32_output");
        assert_eq!(output_name("input_to_input"), "output_to_input");
        assert_eq!(output_name("Input"), "Input");
        assert_eq!(output_name("x"), "x");
    }

    #[test]
    fn test_pass_through_shares_buffer() {
        let input = Tensor::from_values("int32_input", vec![2, 2], &[1i32, 2, 3, 4]).unwrap();
        let output = pass_through(&input);

        assert_eq!(output.name(), "int32_output");
        assert_eq!(output.shape(), input.shape());
        assert_eq!(output.data_type(), DataType::Int32);

        let (a, b) = (input.host_bytes().unwrap(), output.host_bytes().unwrap());
        assert_eq!(a.as_ptr(), b.as_ptr());
    }

    #[test]
    fn test_pass_through_device_round_trip() {
        let memory = MockMemory::new();
        let input = Tensor::from_values("fp64_input", vec![1, 3], &[0.5f64, 1.5, 2.5]).unwrap();

        let output = pass_through_device(&input, &memory).unwrap();

        assert!(output.is_on_device());
        assert_eq!(output.name(), "fp64_output");
        assert_eq!(output.to_values::<f64>().unwrap(), vec![0.5, 1.5, 2.5]);
        assert_eq!(memory.upload_count(), 1);
    }

    #[test]
    fn test_pass_through_device_rejects_strings() {
        let memory = MockMemory::new();
        let input = Tensor::from_strings("string_input", vec![1, 1], &["abc"]).unwrap();

        let err = pass_through_device(&input, &memory).unwrap_err();
        assert!(matches!(err, Error::DeviceMemory(_)));
        assert_eq!(memory.upload_count(), 0);
    }

    #[test]
    fn test_pass_through_device_propagates_upload_failure() {
        let memory = MockMemory::failing();
        let input = Tensor::from_values("uint8_input", vec![1, 2], &[1u8, 2]).unwrap();

        let err = pass_through_device(&input, &memory).unwrap_err();
        assert!(matches!(err, Error::DeviceMemory(_)));
    }

    #[test]
    fn test_bytes_encoding_layout() {
        let raw = encode_bytes_elements("t", &["hello", ""]).unwrap();
        assert_eq!(&raw[..4], &5u32.to_le_bytes());
        assert_eq!(&raw[4..9], b"hello");
        assert_eq!(&raw[9..13], &0u32.to_le_bytes());
        assert_eq!(raw.len(), 13);

        let decoded = decode_bytes_elements("t", &raw).unwrap();
        assert_eq!(decoded, vec![b"hello".to_vec(), Vec::new()]);
    }

    #[test]
    fn test_bytes_decoding_rejects_truncation() {
        let mut raw = 10u32.to_le_bytes().to_vec();
        raw.extend_from_slice(b"short");
        assert!(decode_bytes_elements("t", &raw).is_err());
        assert!(decode_bytes_elements("t", &[1, 0]).is_err());
    }
}
