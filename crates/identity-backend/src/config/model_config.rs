use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::tensor::DataType;

/// Declared input or output of a model.
///
/// A dimension of `-1` accepts any size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorSpec {
    pub name: String,

    #[serde(default)]
    pub data_type: DataType,

    #[serde(default)]
    pub dims: Vec<i64>,

    /// Inputs only: the request may omit this tensor
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
}

impl TensorSpec {
    pub fn new(name: impl Into<String>, data_type: DataType, dims: Vec<i64>) -> Self {
        Self {
            name: name.into(),
            data_type,
            dims,
            optional: false,
        }
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }
}

/// A free-form configuration parameter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelParameter {
    #[serde(default)]
    pub string_value: String,
}

impl ModelParameter {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            string_value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decoupled: Option<bool>,
}

/// The model configuration document exchanged with the serving host.
///
/// Only the fields the identity model reads or writes are typed; everything
/// else the host put in the document is kept in [`ModelConfig::extra`] and
/// written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default)]
    pub max_batch_size: u32,

    #[serde(default)]
    pub input: Vec<TensorSpec>,

    #[serde(default)]
    pub output: Vec<TensorSpec>,

    #[serde(default)]
    pub parameters: BTreeMap<String, ModelParameter>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_transaction_policy: Option<TransactionPolicy>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModelConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// The `string_value` of parameter `key`, if present
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(|p| p.string_value.as_str())
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), ModelParameter::new(value));
        self
    }

    /// Whether the transaction policy declares the model decoupled
    pub fn is_decoupled(&self) -> bool {
        self.model_transaction_policy
            .as_ref()
            .and_then(|p| p.decoupled)
            .unwrap_or(false)
    }

    pub fn input(&self, name: &str) -> Option<&TensorSpec> {
        self.input.iter().find(|spec| spec.name == name)
    }

    pub fn output(&self, name: &str) -> Option<&TensorSpec> {
        self.output.iter().find(|spec| spec.name == name)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}
