use tracing::trace;

use crate::error::{Error, Result};
use crate::tensor::DataType;
use super::model_config::{ModelConfig, TensorSpec, TransactionPolicy};

/// A partial model configuration handed to a model at load time so it can
/// declare its own inputs, outputs and policies.
///
/// The mutators mirror the host's rules: declaring a tensor that the
/// configuration already names merges into the existing entry, filling in
/// whatever was left unset and refusing anything that contradicts it.
#[derive(Debug, Clone)]
pub struct AutoCompleteConfig {
    config: ModelConfig,
    supported_data_types: Vec<DataType>,
}

impl AutoCompleteConfig {
    pub fn new(config: ModelConfig, supported_data_types: impl Into<Vec<DataType>>) -> Self {
        Self {
            config,
            supported_data_types: supported_data_types.into(),
        }
    }

    /// Parses the host's partial configuration document.
    pub fn from_json(json: &str, supported_data_types: impl Into<Vec<DataType>>) -> Result<Self> {
        Ok(Self::new(ModelConfig::from_json(json)?, supported_data_types))
    }

    /// Element types the host can exchange with the model
    pub fn supported_data_types(&self) -> &[DataType] {
        &self.supported_data_types
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn into_config(self) -> ModelConfig {
        self.config
    }

    pub fn to_json(&self) -> Result<String> {
        self.config.to_json()
    }

    /// Declares an input, merging with an existing input of the same name.
    pub fn add_input(&mut self, spec: TensorSpec) -> Result<()> {
        merge_spec(&self.config.name, "input", &mut self.config.input, spec)
    }

    /// Declares an output, merging with an existing output of the same name.
    pub fn add_output(&mut self, spec: TensorSpec) -> Result<()> {
        if spec.optional {
            return Err(Error::Config(format!(
                "model '{}', output '{}': outputs cannot be optional",
                self.config.name, spec.name
            )));
        }
        merge_spec(&self.config.name, "output", &mut self.config.output, spec)
    }

    /// Sets the largest batch the host may form; `0` disables host batching.
    pub fn set_max_batch_size(&mut self, max_batch_size: u32) {
        trace!(model = %self.config.name, max_batch_size, "setting max batch size");
        self.config.max_batch_size = max_batch_size;
    }

    /// Declares whether the model is decoupled. A policy the configuration
    /// already states cannot be flipped.
    pub fn set_decoupled(&mut self, decoupled: bool) -> Result<()> {
        let policy = self
            .config
            .model_transaction_policy
            .get_or_insert_with(TransactionPolicy::default);

        match policy.decoupled {
            Some(current) if current != decoupled => Err(Error::Config(format!(
                "model '{}': cannot change the decoupled transaction policy, which is already set to '{}'",
                self.config.name, current
            ))),
            _ => {
                policy.decoupled = Some(decoupled);
                Ok(())
            }
        }
    }
}

fn merge_spec(model: &str, kind: &str, existing: &mut Vec<TensorSpec>, spec: TensorSpec) -> Result<()> {
    if spec.name.is_empty() {
        return Err(Error::Config(format!("model '{model}': every {kind} needs a name")));
    }

    let Some(current) = existing.iter_mut().find(|e| e.name == spec.name) else {
        trace!(model, kind, name = %spec.name, "declaring tensor");
        existing.push(spec);
        return Ok(());
    };

    if current.data_type != DataType::Invalid && current.data_type != spec.data_type {
        return Err(Error::Config(format!(
            "model '{model}', {kind} '{}': the model expects data type {} but the configuration specifies {}",
            spec.name, spec.data_type, current.data_type
        )));
    }
    if !current.dims.is_empty() && current.dims != spec.dims {
        return Err(Error::Config(format!(
            "model '{model}', {kind} '{}': the model expects dims {:?} but the configuration specifies {:?}",
            spec.name, spec.dims, current.dims
        )));
    }

    current.data_type = spec.data_type;
    current.dims = spec.dims;
    current.optional |= spec.optional;
    Ok(())
}
