use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::error::Result;
use crate::tensor::Tensor;
use super::sender::ResponseSender;

/// A single request-scoped parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// # RequestParameters
///
/// The parameters a client attached to one request.
///
/// Keys are kept sorted, so the JSON form of equal parameter sets is
/// byte-for-byte identical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestParameters(BTreeMap<String, ParameterValue>);

impl RequestParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParameterValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParameterValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParameterValue)> {
        self.0.iter()
    }

    /// Serializes the parameters as a JSON object
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<K, V> FromIterator<(K, V)> for RequestParameters
where K: Into<String>, V: Into<ParameterValue>
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// # InferenceRequest
///
/// One unit of work handed to the model by the serving host.
///
/// The model only reads a request. In decoupled mode the request also carries
/// the [`ResponseSender`] its responses must be delivered through; the sender
/// is shared, never owned, by the model.
#[derive(Clone)]
pub struct InferenceRequest {
    /// Identifier used in logs and failure reports
    id: String,

    /// Named input tensors, in the order the client sent them
    inputs: Vec<Tensor>,

    /// Client-supplied request parameters
    parameters: RequestParameters,

    /// Delivery channel for decoupled responses
    response_sender: Option<Arc<dyn ResponseSender>>,
}

impl InferenceRequest {
    /// Creates an empty request with a random identifier
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            inputs: Vec::new(),
            parameters: RequestParameters::new(),
            response_sender: None,
        }
    }

    pub fn with_input(mut self, tensor: Tensor) -> Self {
        self.inputs.push(tensor);
        self
    }

    pub fn with_inputs(mut self, tensors: impl IntoIterator<Item = Tensor>) -> Self {
        self.inputs.extend(tensors);
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        self.parameters.insert(key, value);
        self
    }

    pub fn with_parameters(mut self, parameters: RequestParameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_response_sender(mut self, sender: Arc<dyn ResponseSender>) -> Self {
        self.response_sender = Some(sender);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn inputs(&self) -> &[Tensor] {
        &self.inputs
    }

    pub fn input(&self, name: &str) -> Option<&Tensor> {
        self.inputs.iter().find(|t| t.name() == name)
    }

    pub fn parameters(&self) -> &RequestParameters {
        &self.parameters
    }

    pub fn response_sender(&self) -> Option<&Arc<dyn ResponseSender>> {
        self.response_sender.as_ref()
    }
}

impl Default for InferenceRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InferenceRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceRequest")
            .field("id", &self.id)
            .field("inputs", &self.inputs)
            .field("parameters", &self.parameters)
            .field("has_response_sender", &self.response_sender.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameters_json_is_sorted_object() {
        let params: RequestParameters = [("b", "2"), ("a", "1")].into_iter().collect();
        assert_eq!(params.to_json().unwrap(), r#"{"a":"1","b":"2"}"#);
    }

    #[test]
    fn test_parameter_value_kinds() {
        let mut params = RequestParameters::new();
        params.insert("flag", true);
        params.insert("count", 3i64);
        params.insert("ratio", 0.5f64);
        params.insert("label", "x");

        let json = params.to_json().unwrap();
        let back = RequestParameters::from_json(&json).unwrap();

        assert_eq!(back.get("flag"), Some(&ParameterValue::Bool(true)));
        assert_eq!(back.get("count"), Some(&ParameterValue::Int(3)));
        assert_eq!(back.get("ratio"), Some(&ParameterValue::Double(0.5)));
        assert_eq!(back.get("label"), Some(&ParameterValue::String("x".into())));
    }

    #[test]
    fn test_empty_parameters() {
        let params = RequestParameters::new();
        assert!(params.is_empty());
        assert_eq!(params.to_json().unwrap(), "{}");
    }

    #[test]
    fn test_request_builder() {
        let tensor = Tensor::from_values("int32_input", vec![1, 1], &[5i32]).unwrap();
        let request = InferenceRequest::with_id("req-1")
            .with_input(tensor)
            .with_parameter("a", "1");

        assert_eq!(request.id(), "req-1");
        assert_eq!(request.inputs().len(), 1);
        assert!(request.input("int32_input").is_some());
        assert!(request.input("missing").is_none());
        assert_eq!(request.parameters().len(), 1);
        assert!(request.response_sender().is_none());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(InferenceRequest::new().id(), InferenceRequest::new().id());
    }
}
