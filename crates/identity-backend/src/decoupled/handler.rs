use futures::future::join_all;
use tracing::{debug, error, instrument};
use crate::communication::{InferenceRequest, InferenceResponse, StreamMessage};
use crate::error::{Error, Result};
use crate::tensor::operations::pass_through;
use super::report::{StreamFailure, StreamReport};

/// Executes batches for an instance with the decoupled policy.
#[derive(Debug, Default)]
pub(crate) struct DecoupledHandler;

impl DecoupledHandler {
    /// Streams every request concurrently. Only returns once each request has
    /// either received its terminal marker or failed.
    #[instrument(level = "debug", skip_all, fields(batch_size = requests.len()))]
    pub(crate) async fn execute(&self, requests: &[InferenceRequest]) -> StreamReport {
        let results = join_all(requests.iter().map(stream_request)).await;

        let mut report = StreamReport::default();
        for (request, result) in requests.iter().zip(results) {
            match result {
                Ok(()) => report.completed += 1,
                Err(err) => {
                    error!(request_id = request.id(), error = %err, "failed to stream response");
                    report.failures.push(StreamFailure {
                        request_id: request.id().to_owned(),
                        error: err,
                    });
                }
            }
        }

        debug!(completed = report.completed, failed = report.failed(), "decoupled batch complete");
        report
    }
}

/// Sends one echo response and then the terminal marker. The marker is not
/// attempted if the response could not be delivered.
async fn stream_request(request: &InferenceRequest) -> Result<()> {
    let sender = request.response_sender().ok_or_else(|| Error::MissingSender {
        request_id: request.id().to_owned(),
    })?;

    let outputs = request.inputs().iter().map(pass_through).collect();
    sender.send(StreamMessage::Response(InferenceResponse::new(outputs))).await?;
    sender.send(StreamMessage::Complete).await
}
