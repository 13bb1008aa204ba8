//! Per-block code metadata fetcher.
//!
//! Reads `eth_getCode` and `eth_getTransactionCount` for one address at one
//! block and turns them into a [`BlockMetadata`]. A failed read never aborts
//! a run: [`MetadataFetcher::fetch`] logs the error and returns the
//! [`BlockMetadata::unknown`] sentinel instead.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::types::{Address, BlockMetadata};

/// Read access to an EVM chain, pinned to historical block numbers.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Runtime bytecode of `address` at `block`. Empty if nothing is deployed.
    async fn get_code(&self, address: &Address, block: u64) -> Result<Vec<u8>, FetchError>;

    /// Nonce (transaction count) of `address` at `block`.
    async fn get_transaction_count(&self, address: &Address, block: u64)
        -> Result<u64, FetchError>;

    /// The chain ID reported by the node.
    async fn chain_id(&self) -> Result<u64, FetchError>;

    /// Returns `true` if the node answers requests at all.
    async fn is_connected(&self) -> bool;

    /// The endpoint this client talks to (URL or name).
    fn endpoint(&self) -> &str;
}

/// Wraps a [`ChainClient`] and produces one metadata record per block.
pub struct MetadataFetcher<C> {
    client: C,
    timeout: Duration,
}

impl<C: ChainClient> MetadataFetcher<C> {
    /// Every individual client call is bounded by `timeout`.
    pub fn new(client: C, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch metadata for `block`, propagating the first failed read.
    pub async fn try_fetch(&self, address: &Address, block: u64) -> Result<BlockMetadata, FetchError> {
        let code = self.bounded(self.client.get_code(address, block)).await?;
        let nonce = self
            .bounded(self.client.get_transaction_count(address, block))
            .await?;
        Ok(BlockMetadata::from_code(block, &code, nonce))
    }

    /// Fetch metadata for `block`, degrading any failure to the unknown sentinel.
    pub async fn fetch(&self, address: &Address, block: u64) -> BlockMetadata {
        match self.try_fetch(address, block).await {
            Ok(meta) => meta,
            Err(e) => {
                tracing::warn!(
                    block,
                    address = %address,
                    endpoint = self.client.endpoint(),
                    error = %e,
                    "failed to fetch contract metadata"
                );
                BlockMetadata::unknown(block)
            }
        }
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, FetchError>>,
    ) -> Result<T, FetchError> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| FetchError::Timeout {
                ms: self.timeout.as_millis() as u64,
            })?
    }
}
