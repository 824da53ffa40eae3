use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::Result;
use super::model_config::{ModelConfig, ModelParameter, TransactionPolicy};
use super::{REQUEST_GPU_MEMORY_PARAMETER, TRUE_VALUE};

/// How an instance delivers responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One response per request, returned from the batch call
    Coupled,
    /// Responses streamed through each request's sender, then a final marker
    Decoupled,
}

/// Per-instance settings resolved once from the finalized configuration.
///
/// Both settings default to off; missing parameters never fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstanceSettings {
    pub decoupled: bool,
    pub request_gpu_memory: bool,
}

/// The slice of the finalized configuration an instance reads
#[derive(Debug, Default, Deserialize)]
struct RuntimeConfig {
    #[serde(default)]
    parameters: BTreeMap<String, ModelParameter>,

    #[serde(default)]
    model_transaction_policy: Option<TransactionPolicy>,
}

impl InstanceSettings {
    /// Resolves settings from the finalized configuration JSON the host passes
    /// at initialization. Fields other than the parameters and the transaction
    /// policy are ignored.
    pub fn from_json(model_config: &str) -> Result<Self> {
        let runtime: RuntimeConfig = serde_json::from_str(model_config)?;
        Ok(Self::resolve(&runtime.parameters, runtime.model_transaction_policy.as_ref()))
    }

    pub fn from_config(config: &ModelConfig) -> Self {
        Self::resolve(&config.parameters, config.model_transaction_policy.as_ref())
    }

    fn resolve(parameters: &BTreeMap<String, ModelParameter>, policy: Option<&TransactionPolicy>) -> Self {
        let decoupled = policy.and_then(|p| p.decoupled).unwrap_or(false);
        let request_gpu_memory = parameters
            .get(REQUEST_GPU_MEMORY_PARAMETER)
            .is_some_and(|p| p.string_value == TRUE_VALUE);

        Self {
            decoupled,
            request_gpu_memory,
        }
    }

    pub fn mode(&self) -> ExecutionMode {
        if self.decoupled {
            ExecutionMode::Decoupled
        } else {
            ExecutionMode::Coupled
        }
    }
}
