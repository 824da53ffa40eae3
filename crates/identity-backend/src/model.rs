use async_trait::async_trait;
use tracing::{info, instrument, warn};
use crate::communication::InferenceRequest;
use crate::config::{AutoCompleteConfig, ExecutionMode, InstanceSettings};
use crate::core::{ExecuteOutcome, InitializeArgs, ServableModel};
use crate::coupled::{CoupledHandler, MemoryPath};
use crate::decoupled::DecoupledHandler;
use crate::error::Result;
use crate::schema;

enum Executor {
    Coupled(CoupledHandler),
    Decoupled(DecoupledHandler),
}

/// # IdentityModel
///
/// A model that returns its inputs unchanged, renamed from `*input*` to
/// `*output*`.
///
/// The execution mode is fixed when the instance is initialized: coupled
/// instances return one response per request (plus an `output_parameters`
/// echo of the request parameters), decoupled instances stream one response
/// and a terminal marker through each request's sender.
///
/// ```
/// # use identity_backend::{IdentityModel, InitializeArgs, ServableModel, ExecuteOutcome};
/// # use identity_backend::communication::InferenceRequest;
/// # use identity_backend::tensor::Tensor;
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> identity_backend::error::Result<()> {
/// let model = IdentityModel::initialize(InitializeArgs::new("{}"))?;
///
/// let input = Tensor::from_values("fp32_input", vec![2, 2], &[1.0f32, 2.0, 3.0, 4.0])?;
/// let request = InferenceRequest::new().with_input(input);
///
/// let ExecuteOutcome::Responses(responses) = model.execute(&[request]).await? else {
///     unreachable!("coupled instance");
/// };
/// let output = responses[0].output("fp32_output").unwrap();
/// assert_eq!(output.to_values::<f32>()?, vec![1.0, 2.0, 3.0, 4.0]);
/// # Ok(())
/// # }
/// ```
pub struct IdentityModel {
    settings: InstanceSettings,
    instance_name: String,
    executor: Executor,
}

impl IdentityModel {
    pub fn settings(&self) -> InstanceSettings {
        self.settings
    }

    pub fn mode(&self) -> ExecutionMode {
        self.settings.mode()
    }

    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }
}

#[async_trait]
impl ServableModel for IdentityModel {
    fn auto_complete_config(config: &mut AutoCompleteConfig) -> Result<()> {
        schema::negotiate(config)
    }

    fn initialize(args: InitializeArgs) -> Result<Self> {
        let settings = InstanceSettings::from_json(&args.model_config)?;

        let executor = match settings.mode() {
            ExecutionMode::Coupled => {
                let memory = match (settings.request_gpu_memory, args.device_memory) {
                    (false, _) => MemoryPath::Host,
                    (true, Some(memory)) => {
                        info!(instance = %args.instance_name, memory = memory.name(), "using device memory for outputs");
                        MemoryPath::Device(memory)
                    }
                    (true, None) => {
                        warn!(
                            instance = %args.instance_name,
                            "device memory requested but unavailable; every batch will fail"
                        );
                        MemoryPath::Unavailable
                    }
                };
                Executor::Coupled(CoupledHandler::new(memory))
            }
            ExecutionMode::Decoupled => {
                if settings.request_gpu_memory {
                    warn!(instance = %args.instance_name, "device memory is ignored by decoupled instances");
                }
                Executor::Decoupled(DecoupledHandler)
            }
        };

        info!(
            instance = %args.instance_name,
            mode = ?settings.mode(),
            request_gpu_memory = settings.request_gpu_memory,
            "initialized identity model"
        );

        Ok(Self {
            settings,
            instance_name: args.instance_name,
            executor,
        })
    }

    #[instrument(skip_all, fields(instance = %self.instance_name, requests = requests.len()))]
    async fn execute(&self, requests: &[InferenceRequest]) -> Result<ExecuteOutcome> {
        match &self.executor {
            Executor::Coupled(handler) => handler.execute(requests).map(ExecuteOutcome::Responses),
            Executor::Decoupled(handler) => Ok(ExecuteOutcome::Streamed(handler.execute(requests).await)),
        }
    }

    fn finalize(&self) {
        info!(instance = %self.instance_name, "cleaning up identity model");
    }
}
