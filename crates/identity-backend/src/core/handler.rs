use std::fmt;
use std::sync::Arc;
use async_trait::async_trait;
use crate::backend::DeviceMemory;
use crate::communication::{InferenceRequest, InferenceResponse};
use crate::config::AutoCompleteConfig;
use crate::decoupled::StreamReport;
use crate::error::Result;

/// What the host hands a new instance
#[derive(Clone, Default)]
pub struct InitializeArgs {
    /// The finalized model configuration, as JSON
    pub model_config: String,

    /// Name the host gave this instance, used in logs
    pub instance_name: String,

    /// Device memory capability, when the host provides one
    pub device_memory: Option<Arc<dyn DeviceMemory>>,
}

impl InitializeArgs {
    pub fn new(model_config: impl Into<String>) -> Self {
        Self {
            model_config: model_config.into(),
            ..Self::default()
        }
    }

    pub fn with_instance_name(mut self, name: impl Into<String>) -> Self {
        self.instance_name = name.into();
        self
    }

    pub fn with_device_memory(mut self, memory: Arc<dyn DeviceMemory>) -> Self {
        self.device_memory = Some(memory);
        self
    }
}

impl fmt::Debug for InitializeArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitializeArgs")
            .field("model_config", &self.model_config)
            .field("instance_name", &self.instance_name)
            .field("device_memory", &self.device_memory.as_ref().map(|m| m.name()))
            .finish()
    }
}

/// Result of one `execute` call
#[derive(Debug)]
pub enum ExecuteOutcome {
    /// Coupled mode: one response per request, aligned by index
    Responses(Vec<InferenceResponse>),

    /// Decoupled mode: responses went through the request senders
    Streamed(StreamReport),
}

impl ExecuteOutcome {
    pub fn into_responses(self) -> Option<Vec<InferenceResponse>> {
        match self {
            Self::Responses(responses) => Some(responses),
            Self::Streamed(_) => None,
        }
    }

    pub fn stream_report(&self) -> Option<&StreamReport> {
        match self {
            Self::Responses(_) => None,
            Self::Streamed(report) => Some(report),
        }
    }
}

/// # ServableModel
///
/// A model a serving host can load, instantiate and run.
///
/// `auto_complete_config` is associated with the type rather than an
/// instance, since it runs before any instance exists. `execute` may be
/// called repeatedly, but never concurrently on the same instance.
#[async_trait]
pub trait ServableModel: Sized + Send + Sync {
    /// Completes the partial configuration supplied by the host.
    fn auto_complete_config(_config: &mut AutoCompleteConfig) -> Result<()> {
        Ok(())
    }

    /// Builds an instance from the finalized configuration.
    fn initialize(args: InitializeArgs) -> Result<Self>;

    /// Processes one batch of requests.
    async fn execute(&self, requests: &[InferenceRequest]) -> Result<ExecuteOutcome>;

    /// Releases instance resources. Called once on unload.
    fn finalize(&self) {}
}
