//! codewatch-rpc — JSON-RPC chain client for CodeWatch.
//!
//! - [`RpcTransport`] — the async trait a transport implements
//! - [`HttpTransport`] — `reqwest` transport with retry and per-request timeout
//! - [`JsonRpcChainClient`] — implements `codewatch_core::ChainClient` over any transport
//!
//! # Quick start
//! ```rust,no_run
//! use codewatch_rpc::{HttpTransportConfig, JsonRpcChainClient};
//!
//! let client = JsonRpcChainClient::http("https://cloudflare-eth.com", HttpTransportConfig::default())
//!     .unwrap();
//! ```

pub mod client;
pub mod encoding;
pub mod error;
pub mod http;
pub mod request;
pub mod retry;
pub mod transport;

pub use client::JsonRpcChainClient;
pub use error::TransportError;
pub use http::{HttpTransport, HttpTransportConfig};
pub use request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcId};
pub use retry::{RetryConfig, RetryPolicy};
pub use transport::RpcTransport;
