//! codewatch-core — bytecode stability detection for EVM contracts.
//!
//! # Architecture
//!
//! ```text
//! MonitorBuilder → StabilityMonitor
//!                      ├── BlockSampler     (which blocks to visit)
//!                      ├── MetadataFetcher  (code size, keccak hash, nonce per block)
//!                      │     └── ChainClient (eth_getCode / eth_getTransactionCount)
//!                      └── StabilityReport  (history + change verdict)
//! ```
//!
//! The core never talks to the network directly; it is driven through the
//! [`ChainClient`] trait. `codewatch-rpc` provides the HTTP implementation.

pub mod builder;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod monitor;
pub mod sampler;
pub mod types;

pub use builder::MonitorBuilder;
pub use config::MonitorConfig;
pub use error::{FetchError, MonitorError};
pub use fetcher::{ChainClient, MetadataFetcher};
pub use monitor::StabilityMonitor;
pub use sampler::BlockSampler;
pub use types::{Address, BlockMetadata, CodeChange, CodeHash, StabilityReport};
