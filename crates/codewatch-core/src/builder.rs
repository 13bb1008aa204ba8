//! Fluent builder API for creating stability monitors.
//!
//! # Example
//!
//! ```rust,no_run
//! use codewatch_core::{Address, MonitorBuilder};
//!
//! let address: Address = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2".parse().unwrap();
//! let monitor = MonitorBuilder::new(address)
//!     .rpc_endpoint("https://cloudflare-eth.com")
//!     .from_block(15_000_000)
//!     .to_block(19_000_000)
//!     .step(250_000)
//!     .build()
//!     .unwrap();
//! ```

use std::time::Duration;

use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::monitor::StabilityMonitor;
use crate::types::Address;

/// Fluent builder for `MonitorConfig`.
pub struct MonitorBuilder {
    config: MonitorConfig,
}

impl MonitorBuilder {
    pub fn new(address: Address) -> Self {
        Self {
            config: MonitorConfig::new(address, String::new()),
        }
    }

    /// Set the RPC endpoint recorded in the report.
    pub fn rpc_endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.rpc_endpoint = url.into();
        self
    }

    /// Set the first sampled block.
    pub fn from_block(mut self, block: u64) -> Self {
        self.config.from_block = block;
        self
    }

    /// Set the last block that may be sampled (inclusive).
    pub fn to_block(mut self, block: u64) -> Self {
        self.config.to_block = block;
        self
    }

    /// Set the sampling step in blocks.
    pub fn step(mut self, step: i64) -> Self {
        self.config.step = step;
        self
    }

    /// Set the per-call RPC timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Build the `MonitorConfig` without validating it.
    pub fn build_config(self) -> MonitorConfig {
        self.config
    }

    /// Validate the configuration and build the monitor.
    pub fn build(self) -> Result<StabilityMonitor, MonitorError> {
        StabilityMonitor::new(self.config)
    }
}
