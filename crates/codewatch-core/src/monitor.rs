//! Samples a block range and flags code changes.
//!
//! # Comparison policy
//!
//! The first sample only establishes the reference hash, even when it has no
//! code. Every later sample is compared with the most recently seen hash:
//!
//! ```text
//! [A, A, A]       → stable
//! [A, B, A]       → two changes (A→B, B→A)
//! [none, A]       → one change (nothing deployed → A)
//! [none, none]    → stable
//! ```
//!
//! A sample whose read failed carries no hash and therefore compares like an
//! empty account.

use std::time::{Duration, Instant};

use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::fetcher::{ChainClient, MetadataFetcher};
use crate::sampler::BlockSampler;
use crate::types::{BlockMetadata, CodeChange, CodeHash, StabilityReport};

/// Comparison state held for the duration of one pass.
#[derive(Debug, Default)]
struct MonitorState {
    /// `false` until the first sample has been seen.
    initialized: bool,
    last_hash: Option<CodeHash>,
    changes_detected: bool,
}

impl MonitorState {
    /// Fold one sample into the state, returning the transition it triggers, if any.
    fn observe(&mut self, meta: &BlockMetadata) -> Option<CodeChange> {
        if !self.initialized {
            self.initialized = true;
            self.last_hash = meta.code_hash;
            return None;
        }
        if meta.code_hash == self.last_hash {
            return None;
        }
        let change = CodeChange {
            block: meta.block,
            previous: self.last_hash,
            current: meta.code_hash,
        };
        self.changes_detected = true;
        self.last_hash = meta.code_hash;
        Some(change)
    }
}

/// Runs a bytecode stability pass for one address over a validated block range.
#[derive(Debug, Clone)]
pub struct StabilityMonitor {
    config: MonitorConfig,
    sampler: BlockSampler,
}

impl StabilityMonitor {
    /// Validate `config` and build a monitor. Fails before any network access
    /// if the step is not positive.
    pub fn new(config: MonitorConfig) -> Result<Self, MonitorError> {
        let sampler = BlockSampler::new(config.from_block, config.to_block, config.step)?;
        Ok(Self { config, sampler })
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn sampler(&self) -> &BlockSampler {
        &self.sampler
    }

    /// Check connectivity, resolve the chain ID and sample the configured range.
    ///
    /// Only a failed connectivity check is an error; individual block reads
    /// degrade into unknown records in the report's history.
    pub async fn audit<C: ChainClient>(&self, client: C) -> Result<StabilityReport, MonitorError> {
        let started = Instant::now();
        let timeout = self.config.timeout;

        let connected = tokio::time::timeout(timeout, client.is_connected())
            .await
            .unwrap_or(false);
        if !connected {
            return Err(MonitorError::Connectivity(format!(
                "RPC endpoint {} is not reachable",
                client.endpoint()
            )));
        }

        let chain_id = match tokio::time::timeout(timeout, client.chain_id()).await {
            Ok(Ok(id)) => Some(id),
            Ok(Err(e)) => {
                tracing::debug!(error = %e, "chain id unavailable");
                None
            }
            Err(_) => {
                tracing::debug!(
                    timeout_ms = timeout.as_millis() as u64,
                    "chain id request timed out"
                );
                None
            }
        };

        tracing::info!(
            address = %self.config.address,
            endpoint = client.endpoint(),
            chain_id,
            from = self.sampler.from_block(),
            to = self.sampler.to_block(),
            step = self.sampler.step(),
            samples = self.sampler.len(),
            "starting bytecode stability check"
        );

        let fetcher = MetadataFetcher::new(client, timeout);
        Ok(self
            .pass(self.sampler.iter(), &fetcher, chain_id, started)
            .await)
    }

    /// Sample `blocks` (ascending) through `fetcher` and build the report.
    pub async fn run<C, I>(&self, blocks: I, fetcher: &MetadataFetcher<C>) -> StabilityReport
    where
        C: ChainClient,
        I: IntoIterator<Item = u64>,
    {
        self.pass(blocks, fetcher, None, Instant::now()).await
    }

    async fn pass<C, I>(
        &self,
        blocks: I,
        fetcher: &MetadataFetcher<C>,
        chain_id: Option<u64>,
        started: Instant,
    ) -> StabilityReport
    where
        C: ChainClient,
        I: IntoIterator<Item = u64>,
    {
        let address = self.config.address;
        let mut state = MonitorState::default();
        let mut history = Vec::new();
        let mut changes = Vec::new();

        for block in blocks {
            tracing::info!(block, "checking block");
            let meta = fetcher.fetch(&address, block).await;
            if let Some(change) = state.observe(&meta) {
                tracing::warn!(%change, "bytecode change detected");
                changes.push(change);
            }
            history.push(meta);
        }

        let elapsed = started.elapsed();
        log_verdict(history.len(), state.changes_detected, elapsed);

        let rpc_endpoint = if self.config.rpc_endpoint.is_empty() {
            fetcher.client().endpoint().to_string()
        } else {
            self.config.rpc_endpoint.clone()
        };

        StabilityReport {
            address,
            rpc_endpoint,
            chain_id,
            from_block: self.sampler.from_block(),
            to_block: self.sampler.to_block(),
            step: self.sampler.step(),
            history,
            changes_detected: state.changes_detected,
            changes,
            elapsed_seconds: elapsed.as_secs_f64(),
        }
    }
}

fn log_verdict(samples: usize, changed: bool, elapsed: Duration) {
    let elapsed_ms = elapsed.as_millis() as u64;
    if changed {
        tracing::warn!(samples, elapsed_ms, "bytecode changed during the monitored range");
    } else {
        tracing::info!(samples, elapsed_ms, "bytecode stable across all sampled blocks");
    }
}
