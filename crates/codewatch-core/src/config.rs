//! Monitor configuration.

use std::time::Duration;

use crate::types::Address;

/// Default sampling step, in blocks.
pub const DEFAULT_STEP: i64 = 100_000;

/// Default bound on each individual RPC call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a single monitoring run.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Contract address to watch.
    pub address: Address,
    /// RPC endpoint, recorded in the report.
    pub rpc_endpoint: String,
    /// First sampled block.
    pub from_block: u64,
    /// Last block that may be sampled (inclusive).
    pub to_block: u64,
    /// Distance between samples. Must be positive; checked when the monitor is built.
    pub step: i64,
    /// Timeout applied to each `eth_getCode` / `eth_getTransactionCount` call.
    pub timeout: Duration,
}

impl MonitorConfig {
    pub fn new(address: Address, rpc_endpoint: impl Into<String>) -> Self {
        Self {
            address,
            rpc_endpoint: rpc_endpoint.into(),
            from_block: 0,
            to_block: 0,
            step: DEFAULT_STEP,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
