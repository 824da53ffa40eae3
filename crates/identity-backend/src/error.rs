//! Error types for the identity backend.
//!
//! [`Error`] is the single error type returned by every fallible operation in
//! the crate; [`Result`] is the matching alias.

/// Convenience alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while negotiating, initializing, or executing the model.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The model configuration is missing fields or conflicts with the
    /// schema the model tried to declare. Fatal at load time.
    #[error("invalid model configuration: {0}")]
    Config(String),

    /// A JSON document (model configuration or request parameters) could not
    /// be parsed or produced.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A tensor's buffer does not agree with its declared type and shape, or
    /// a typed view was requested with the wrong element type.
    #[error("tensor '{name}': {message}")]
    Tensor {
        /// Name of the offending tensor.
        name: String,
        /// What was wrong with it.
        message: String,
    },

    /// The instance was initialized with `request_gpu_memory` but no device
    /// memory capability was injected.
    #[error("device memory was requested but no device memory capability is available")]
    DeviceMemoryUnavailable,

    /// The device memory capability failed to upload or export a buffer.
    #[error("device memory error: {0}")]
    DeviceMemory(String),

    /// A request reached the streaming executor without a response sender.
    #[error("request '{request_id}' has no response sender")]
    MissingSender {
        /// Identifier of the request.
        request_id: String,
    },

    /// The receiving side of a response channel is gone.
    #[error("response channel for request '{request_id}' is closed")]
    SenderClosed {
        /// Identifier of the request.
        request_id: String,
    },

    /// A response sender was written after its terminal marker.
    #[error("response channel for request '{request_id}' was already completed")]
    SenderCompleted {
        /// Identifier of the request.
        request_id: String,
    },
}

impl Error {
    pub(crate) fn tensor(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Tensor {
            name: name.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = Error::Config("missing name".into());
        assert_eq!(err.to_string(), "invalid model configuration: missing name");

        let err = Error::tensor("fp32_input", "bad length");
        assert_eq!(err.to_string(), "tensor 'fp32_input': bad length");

        let err = Error::MissingSender { request_id: "r1".into() };
        assert_eq!(err.to_string(), "request 'r1' has no response sender");
    }

    #[test]
    fn test_from_serde_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
