use std::sync::Arc;
use tracing::{debug, instrument};
use crate::backend::DeviceMemory;
use crate::communication::{InferenceRequest, InferenceResponse, RequestParameters};
use crate::error::{Error, Result};
use crate::tensor::constant::{OUTPUT_PARAMETERS, OUTPUT_PARAMETERS_DIMS};
use crate::tensor::operations::{pass_through, pass_through_device};
use crate::tensor::Tensor;

/// Where echoed output buffers live
#[derive(Clone)]
pub(crate) enum MemoryPath {
    /// Outputs share the input's host buffer
    Host,
    /// Outputs are staged through the injected device memory
    Device(Arc<dyn DeviceMemory>),
    /// Device memory was requested but none was provided; every batch fails
    Unavailable,
}

/// Executes batches for an instance without the decoupled policy.
pub(crate) struct CoupledHandler {
    memory: MemoryPath,
}

impl CoupledHandler {
    pub(crate) fn new(memory: MemoryPath) -> Self {
        Self { memory }
    }

    /// Produces exactly one response per request, aligned by index.
    #[instrument(level = "debug", skip_all, fields(batch_size = requests.len()))]
    pub(crate) fn execute(&self, requests: &[InferenceRequest]) -> Result<Vec<InferenceResponse>> {
        let memory = match &self.memory {
            MemoryPath::Host => None,
            MemoryPath::Device(memory) => Some(memory.as_ref()),
            MemoryPath::Unavailable => return Err(Error::DeviceMemoryUnavailable),
        };

        let responses = requests
            .iter()
            .map(|request| respond(request, memory))
            .collect::<Result<Vec<_>>>()?;

        debug!(responses = responses.len(), "coupled batch complete");
        Ok(responses)
    }
}

fn respond(request: &InferenceRequest, memory: Option<&dyn DeviceMemory>) -> Result<InferenceResponse> {
    let mut outputs = Vec::with_capacity(request.inputs().len() + 1);
    for input in request.inputs() {
        let output = match memory {
            Some(memory) => pass_through_device(input, memory)?,
            None => pass_through(input),
        };
        outputs.push(output);
    }
    outputs.push(parameters_tensor(request.parameters())?);
    Ok(InferenceResponse::new(outputs))
}

/// Builds the `output_parameters` tensor: one string element holding the
/// request parameters serialized as a JSON object.
pub(crate) fn parameters_tensor(parameters: &RequestParameters) -> Result<Tensor> {
    let json = parameters.to_json()?;
    Tensor::from_strings(OUTPUT_PARAMETERS, OUTPUT_PARAMETERS_DIMS.to_vec(), &[json])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock_memory::MockMemory;
    use crate::tensor::{f16, output_name, DataType};

    fn fp32_request() -> InferenceRequest {
        let input = Tensor::from_values("fp32_input", vec![2, 2], &[1.0f32, 2.0, 3.0, 4.0]).unwrap();
        InferenceRequest::with_id("fp32").with_input(input)
    }

    fn parameters_json(response: &InferenceResponse) -> String {
        let tensor = response.output(OUTPUT_PARAMETERS).unwrap();
        let strings = tensor.to_strings().unwrap();
        assert_eq!(strings.len(), 1);
        String::from_utf8(strings[0].clone()).unwrap()
    }

    #[test]
    fn test_echoes_fp32_input() {
        let handler = CoupledHandler::new(MemoryPath::Host);
        let responses = handler.execute(&[fp32_request()]).unwrap();

        assert_eq!(responses.len(), 1);
        let outputs = responses[0].outputs();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].name(), "fp32_output");
        assert_eq!(outputs[0].data_type(), DataType::Fp32);
        assert_eq!(outputs[0].shape(), &[2, 2]);
        assert_eq!(outputs[0].to_values::<f32>().unwrap(), vec![1.0, 2.0, 3.0, 4.0]);

        assert_eq!(outputs[1].name(), OUTPUT_PARAMETERS);
        assert_eq!(outputs[1].data_type(), DataType::Bytes);
        assert_eq!(outputs[1].shape(), &[1]);
        assert_eq!(parameters_json(&responses[0]), "{}");
    }

    #[test]
    fn test_echoes_fp16_values() {
        let values: Vec<f16> = [0.5f32, -1.0, 2.0, 65504.0].iter().map(|v| f16::from_f32(*v)).collect();
        let input = Tensor::from_values("fp16_input", vec![2, 2], &values).unwrap();
        let request = InferenceRequest::new().with_input(input);

        let responses = CoupledHandler::new(MemoryPath::Host).execute(&[request]).unwrap();
        let output = responses[0].output("fp16_output").unwrap();
        assert_eq!(output.data_type(), DataType::Fp16);
        assert_eq!(output.shape(), &[2, 2]);
        assert_eq!(output.to_values::<f16>().unwrap(), values);
    }

    #[test]
    fn test_echoes_every_supported_type() {
        let (rows, cols) = (2usize, 3usize);
        let request = DataType::SUPPORTED.iter().fold(InferenceRequest::new(), |request, data_type| {
            let name = format!("{}_input", data_type.type_name());
            let shape = vec![rows as i64, cols as i64];
            let tensor = match data_type.element_size() {
                Some(width) => {
                    // bool elements must stay 0 or 1
                    let data: Vec<u8> = (0..rows * cols * width).map(|i| (i % 2) as u8).collect();
                    Tensor::from_bytes(name, *data_type, shape, data).unwrap()
                }
                None => Tensor::from_strings(name, shape, &["a", "bb", "", "ccc", "d", "ee"]).unwrap(),
            };
            request.with_input(tensor)
        });

        let responses = CoupledHandler::new(MemoryPath::Host).execute(std::slice::from_ref(&request)).unwrap();
        for input in request.inputs() {
            let output = responses[0].output(&output_name(input.name())).unwrap();
            assert_eq!(output.data_type(), input.data_type());
            assert_eq!(output.shape(), input.shape());
            assert_eq!(output.host_bytes().unwrap(), input.host_bytes().unwrap());
        }
    }

    #[test]
    fn test_echoes_parameters() {
        let request = InferenceRequest::new()
            .with_input(Tensor::from_strings("string_input", vec![1, 1], &["hello"]).unwrap())
            .with_parameter("a", "1")
            .with_parameter("b", true);

        let responses = CoupledHandler::new(MemoryPath::Host).execute(&[request]).unwrap();
        let echoed: serde_json::Value = serde_json::from_str(&parameters_json(&responses[0])).unwrap();
        assert_eq!(echoed, serde_json::json!({"a": "1", "b": true}));

        let string_output = responses[0].output("string_output").unwrap();
        assert_eq!(string_output.to_strings().unwrap(), vec![b"hello".to_vec()]);
    }

    #[test]
    fn test_preserves_input_order_and_unmatched_names() {
        let request = InferenceRequest::new()
            .with_input(Tensor::from_values("int8_input", vec![1, 1], &[1i8]).unwrap())
            .with_input(Tensor::from_values("INPUT0", vec![1, 1], &[2i8]).unwrap())
            .with_input(Tensor::from_values("bool_input", vec![1, 2], &[true, false]).unwrap());

        let responses = CoupledHandler::new(MemoryPath::Host).execute(&[request]).unwrap();
        let names: Vec<_> = responses[0].outputs().iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["int8_output", "INPUT0", "bool_output", OUTPUT_PARAMETERS]);
    }

    #[test]
    fn test_request_without_inputs() {
        let responses = CoupledHandler::new(MemoryPath::Host)
            .execute(&[InferenceRequest::new()])
            .unwrap();
        assert_eq!(responses[0].outputs().len(), 1);
        assert_eq!(responses[0].outputs()[0].name(), OUTPUT_PARAMETERS);
    }

    #[test]
    fn test_batch_alignment() {
        let requests: Vec<_> = (0..5i64)
            .map(|i| {
                InferenceRequest::new()
                    .with_input(Tensor::from_values("int64_input", vec![1, 1], &[i]).unwrap())
                    .with_parameter("index", i)
            })
            .collect();

        let responses = CoupledHandler::new(MemoryPath::Host).execute(&requests).unwrap();
        assert_eq!(responses.len(), requests.len());
        for (i, response) in responses.iter().enumerate() {
            let values = response.output("int64_output").unwrap().to_values::<i64>().unwrap();
            assert_eq!(values, vec![i as i64]);
            assert_eq!(parameters_json(response), format!(r#"{{"index":{i}}}"#));
        }
    }

    #[test]
    fn test_empty_batch() {
        let responses = CoupledHandler::new(MemoryPath::Host).execute(&[]).unwrap();
        assert!(responses.is_empty());
    }

    #[test]
    fn test_is_idempotent() {
        let handler = CoupledHandler::new(MemoryPath::Host);
        let request = fp32_request().with_parameter("k", "v");

        let first = handler.execute(std::slice::from_ref(&request)).unwrap();
        let second = handler.execute(std::slice::from_ref(&request)).unwrap();
        for (a, b) in first[0].outputs().iter().zip(second[0].outputs()) {
            assert_eq!(a.name(), b.name());
            assert_eq!(a.shape(), b.shape());
            assert_eq!(a.host_bytes().unwrap(), b.host_bytes().unwrap());
        }
    }

    #[test]
    fn test_device_path() {
        let memory = Arc::new(MockMemory::new());
        let handler = CoupledHandler::new(MemoryPath::Device(memory.clone()));

        let responses = handler.execute(&[fp32_request()]).unwrap();
        let output = responses[0].output("fp32_output").unwrap();
        assert!(output.is_on_device());
        assert_eq!(output.to_values::<f32>().unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
        assert!(!responses[0].output(OUTPUT_PARAMETERS).unwrap().is_on_device());
        assert_eq!(memory.upload_count(), 1);
    }

    #[test]
    fn test_device_unavailable_fails_batch() {
        let handler = CoupledHandler::new(MemoryPath::Unavailable);
        let err = handler.execute(&[fp32_request()]).unwrap_err();
        assert!(matches!(err, Error::DeviceMemoryUnavailable));
    }

    #[test]
    fn test_device_failure_aborts_whole_batch() {
        let handler = CoupledHandler::new(MemoryPath::Device(Arc::new(MockMemory::failing())));
        let err = handler.execute(&[fp32_request(), fp32_request()]).unwrap_err();
        assert!(matches!(err, Error::DeviceMemory(_)));
    }

    #[test]
    fn test_device_path_rejects_strings() {
        let request = InferenceRequest::new()
            .with_input(Tensor::from_strings("string_input", vec![1], &["x"]).unwrap());
        let handler = CoupledHandler::new(MemoryPath::Device(Arc::new(MockMemory::new())));
        assert!(handler.execute(&[request]).is_err());
    }
}
