use crate::error::Error;

/// A request whose responses could not be fully delivered
#[derive(Debug)]
pub struct StreamFailure {
    pub request_id: String,
    pub error: Error,
}

/// Outcome of one decoupled batch
#[derive(Debug, Default)]
pub struct StreamReport {
    /// Requests that received their response and terminal marker
    pub completed: usize,

    /// Requests whose delivery failed, in batch order
    pub failures: Vec<StreamFailure>,
}

impl StreamReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}
