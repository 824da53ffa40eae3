use crate::tensor::Tensor;

/// # InferenceResponse
///
/// The output tensors produced for one request, in production order.
#[derive(Debug, Clone, Default)]
pub struct InferenceResponse {
    outputs: Vec<Tensor>,
}

impl InferenceResponse {
    pub fn new(outputs: Vec<Tensor>) -> Self {
        Self { outputs }
    }

    pub fn outputs(&self) -> &[Tensor] {
        &self.outputs
    }

    /// Looks up an output by name
    pub fn output(&self, name: &str) -> Option<&Tensor> {
        self.outputs.iter().find(|t| t.name() == name)
    }

    pub fn into_outputs(self) -> Vec<Tensor> {
        self.outputs
    }
}
