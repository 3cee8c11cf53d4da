//! Error taxonomy for calls into the engine.

use thiserror::Error;

/// Errors surfaced by calls into the render engine.
///
/// The engine distinguishes exactly one failure class — an argument it
/// rejected — from everything else. All remaining RPC failures, whether
/// transport faults or unknown engine-side errors, collapse into
/// [`ApiError::Rpc`] carrying the numeric status code and message text.
/// Failures propagate immediately to the caller; this layer never retries.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The engine rejected an argument of the request.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Any other RPC failure, with the raw status code and message.
    #[error("RPC failed ({code}): {message}")]
    Rpc {
        /// Numeric gRPC status code as received.
        code: i32,
        /// Status message text as received.
        message: String,
    },
    /// The engine socket could not be dialed.
    #[error("failed to connect to engine: {0}")]
    Connect(String),
}

impl ApiError {
    /// Whether this is the distinguished invalid-argument class.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, ApiError::InvalidArgument(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_code_and_message() {
        let err = ApiError::Rpc {
            code: 14,
            message: "engine unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "RPC failed (14): engine unavailable");
        assert!(!err.is_invalid_argument());
    }

    #[test]
    fn invalid_argument_is_distinguished() {
        let err = ApiError::InvalidArgument("pin index out of range".to_string());
        assert!(err.is_invalid_argument());
    }
}
