//! Error types for the stability monitor.

use thiserror::Error;

/// Errors that abort a monitoring run before any sample is taken.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Block range, step or address parameters are unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The RPC endpoint could not be reached or did not answer.
    #[error("Connectivity error: {0}")]
    Connectivity(String),
}

/// A failed read against the chain for a single sampled block.
///
/// These never abort a run; the fetcher folds them into a sentinel record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connection refused, HTTP failure, broken response body.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The node answered with a JSON-RPC error object (pruned state, bad params, ...).
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The call did not complete within the configured timeout.
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// The node answered, but the payload was not what the method promises.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Returns `true` if the call was cut off by a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
