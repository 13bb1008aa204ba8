//! `ChainClient` over any JSON-RPC transport.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};

use codewatch_core::{Address, ChainClient, FetchError};

use crate::encoding::{as_str, block_tag, decode_data, parse_quantity};
use crate::error::TransportError;
use crate::http::{HttpTransport, HttpTransportConfig};
use crate::transport::RpcTransport;

/// Reads code, nonces and chain metadata through an [`RpcTransport`].
pub struct JsonRpcChainClient<T> {
    transport: T,
    next_id: AtomicU64,
}

impl JsonRpcChainClient<HttpTransport> {
    /// Client for an HTTP endpoint.
    pub fn http(url: impl Into<String>, config: HttpTransportConfig) -> Result<Self, TransportError> {
        Ok(Self::new(HttpTransport::new(url, config)?))
    }
}

impl<T: RpcTransport> JsonRpcChainClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.transport.call(id, method, params).await
    }

    async fn call_quantity(&self, method: &str, params: Vec<Value>) -> Result<u64, FetchError> {
        let value = self.call(method, params).await?;
        Ok(parse_quantity(as_str(&value)?)?)
    }
}

#[async_trait]
impl<T: RpcTransport> ChainClient for JsonRpcChainClient<T> {
    async fn get_code(&self, address: &Address, block: u64) -> Result<Vec<u8>, FetchError> {
        let value = self
            .call("eth_getCode", vec![json!(address.to_string()), block_tag(block)])
            .await?;
        Ok(decode_data(as_str(&value)?)?)
    }

    async fn get_transaction_count(&self, address: &Address, block: u64) -> Result<u64, FetchError> {
        self.call_quantity(
            "eth_getTransactionCount",
            vec![json!(address.to_string()), block_tag(block)],
        )
        .await
    }

    async fn chain_id(&self) -> Result<u64, FetchError> {
        self.call_quantity("eth_chainId", vec![]).await
    }

    async fn is_connected(&self) -> bool {
        match self.call("web3_clientVersion", vec![]).await {
            Ok(version) => {
                tracing::debug!(url = self.transport.url(), %version, "connected");
                true
            }
            Err(e) => {
                tracing::debug!(url = self.transport.url(), error = %e, "connectivity check failed");
                false
            }
        }
    }

    fn endpoint(&self) -> &str {
        self.transport.url()
    }
}
