//! Transport-level error types.

use codewatch_core::FetchError;
use thiserror::Error;

use crate::request::JsonRpcError;

/// Errors that can occur while talking to a JSON-RPC endpoint.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed (connection refused, non-2xx status, broken body).
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON-RPC error object returned by the node.
    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(JsonRpcError),

    /// Request timed out after the configured duration.
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// Response could not be deserialized.
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// A result value that does not match the method's encoding (bad hex, wrong type).
    #[error("Malformed result: {0}")]
    Malformed(String),

    /// An unexpected error.
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Returns `true` if this error is retryable (transient).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Timeout { .. })
    }
}

impl From<TransportError> for FetchError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Rpc(e) => FetchError::Rpc {
                code: e.code,
                message: e.message,
            },
            TransportError::Timeout { ms } => FetchError::Timeout { ms },
            TransportError::Deserialization(e) => FetchError::Malformed(e.to_string()),
            TransportError::Malformed(msg) => FetchError::Malformed(msg),
            other @ (TransportError::Http(_) | TransportError::Other(_)) => {
                FetchError::Transport(other.to_string())
            }
        }
    }
}
