//! End-to-end monitor tests against a scripted in-memory chain.
//!
//! Each scenario describes the contract's deployment history as a list of
//! `(first_block, code)` entries; reads at a block return the code of the
//! latest entry at or before it.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use codewatch_core::{
    Address, BlockMetadata, ChainClient, CodeHash, FetchError, MetadataFetcher, MonitorBuilder,
    MonitorError,
};

// ─── Helpers ──────────────────────────────────────────────────────────────────

const V1: &[u8] = &[0x60, 0x80, 0x60, 0x40, 0x52, 0x01];
const V2: &[u8] = &[0x60, 0x80, 0x60, 0x40, 0x52, 0x02];

struct ScriptedChain {
    deployments: Vec<(u64, &'static [u8])>,
    failing: HashSet<u64>,
    connected: bool,
    chain_id: Option<u64>,
    reads: Arc<AtomicUsize>,
}

impl ScriptedChain {
    fn new(deployments: Vec<(u64, &'static [u8])>) -> Self {
        Self {
            deployments,
            failing: HashSet::new(),
            connected: true,
            chain_id: Some(1),
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn failing_at(mut self, block: u64) -> Self {
        self.failing.insert(block);
        self
    }

    fn code_at(&self, block: u64) -> &'static [u8] {
        self.deployments
            .iter()
            .rev()
            .find(|(from, _)| *from <= block)
            .map(|(_, code)| *code)
            .unwrap_or(&[])
    }
}

#[async_trait]
impl ChainClient for ScriptedChain {
    async fn get_code(&self, _address: &Address, block: u64) -> Result<Vec<u8>, FetchError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&block) {
            return Err(FetchError::Rpc {
                code: -32000,
                message: format!("missing trie node for block {block}"),
            });
        }
        Ok(self.code_at(block).to_vec())
    }

    async fn get_transaction_count(&self, _address: &Address, _block: u64) -> Result<u64, FetchError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(1)
    }

    async fn chain_id(&self) -> Result<u64, FetchError> {
        self.chain_id
            .ok_or_else(|| FetchError::Transport("eth_chainId not supported".into()))
    }

    async fn is_connected(&self) -> bool {
        self.connected
    }

    fn endpoint(&self) -> &str {
        "scripted://chain"
    }
}

fn address() -> Address {
    "0x5FbDB2315678afecb367f032d93F642f64180aa3".parse().unwrap()
}

fn builder(from: u64, to: u64, step: i64) -> MonitorBuilder {
    MonitorBuilder::new(address())
        .rpc_endpoint("scripted://chain")
        .from_block(from)
        .to_block(to)
        .step(step)
        .timeout(Duration::from_secs(1))
}

// ─── Scenarios ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn stable_contract() {
    let chain = ScriptedChain::new(vec![(0, V1)]);
    let report = builder(100, 300, 100).build().unwrap().audit(chain).await.unwrap();

    assert_eq!(report.sample_count(), 3);
    assert!(!report.changes_detected);
    assert!(report.changes.is_empty());
    assert!(report.is_stable());
    assert_eq!(report.chain_id, Some(1));
    let blocks: Vec<u64> = report.history.iter().map(|m| m.block).collect();
    assert_eq!(blocks, vec![100, 200, 300]);
    assert!(report
        .history
        .iter()
        .all(|m| m.code_hash == CodeHash::of_code(V1) && m.code_size == V1.len()));
}

#[tokio::test]
async fn upgrade_and_revert_reports_both_transitions() {
    let chain = ScriptedChain::new(vec![(0, V1), (150, V2), (250, V1)]);
    let report = builder(100, 300, 100).build().unwrap().audit(chain).await.unwrap();

    assert!(report.changes_detected);
    assert_eq!(report.changes.len(), 2);
    assert_eq!(report.changes[0].block, 200);
    assert_eq!(report.changes[0].current, CodeHash::of_code(V2));
    assert_eq!(report.changes[1].block, 300);
    assert_eq!(report.changes[1].current, CodeHash::of_code(V1));
}

#[tokio::test]
async fn deployment_inside_range_is_a_change() {
    let chain = ScriptedChain::new(vec![(150, V1)]);
    let report = builder(100, 200, 100).build().unwrap().audit(chain).await.unwrap();

    assert_eq!(report.history[0].code_size, 0);
    assert!(report.history[0].code_hash.is_none());
    assert_eq!(report.history[0].nonce, Some(1));
    assert!(report.changes_detected);
    assert_eq!(report.changes.len(), 1);
    assert_eq!(report.changes[0].previous, None);
}

#[tokio::test]
async fn single_sample_is_stable() {
    let chain = ScriptedChain::new(vec![(0, V2)]);
    let report = builder(500, 550, 100).build().unwrap().audit(chain).await.unwrap();
    assert_eq!(report.sample_count(), 1);
    assert!(!report.changes_detected);
}

#[tokio::test]
async fn empty_range_is_vacuously_stable() {
    let chain = ScriptedChain::new(vec![(0, V1)]);
    let reads = chain.reads.clone();
    let report = builder(10, 9, 1).build().unwrap().audit(chain).await.unwrap();

    assert!(report.history.is_empty());
    assert!(!report.changes_detected);
    assert_eq!(reads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failed_block_does_not_abort_the_run() {
    let chain = ScriptedChain::new(vec![(0, V1)]).failing_at(200);
    let report = builder(100, 300, 100).build().unwrap().audit(chain).await.unwrap();

    assert_eq!(report.sample_count(), 3);
    assert_eq!(report.history[1], BlockMetadata::unknown(200));
    assert_eq!(report.history[2].code_hash, CodeHash::of_code(V1));
    // V1 → unknown → V1
    assert_eq!(report.changes.len(), 2);
}

#[tokio::test]
async fn non_positive_step_fails_before_network_access() {
    for step in [0, -100] {
        let err = builder(0, 1_000, step).build().unwrap_err();
        assert!(matches!(err, MonitorError::InvalidConfiguration(_)));
    }
}

#[tokio::test]
async fn unreachable_endpoint_yields_no_report() {
    let mut chain = ScriptedChain::new(vec![(0, V1)]);
    chain.connected = false;
    let reads = chain.reads.clone();

    let err = builder(0, 100, 10).build().unwrap().audit(chain).await.unwrap_err();
    assert!(matches!(err, MonitorError::Connectivity(_)));
    assert_eq!(reads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_chain_id_is_not_fatal() {
    let mut chain = ScriptedChain::new(vec![(0, V1)]);
    chain.chain_id = None;
    let report = builder(0, 0, 1).build().unwrap().audit(chain).await.unwrap();
    assert_eq!(report.chain_id, None);
    assert_eq!(report.sample_count(), 1);
}

#[tokio::test]
async fn run_accepts_an_explicit_block_list() {
    let monitor = builder(0, 0, 1).build().unwrap();
    let fetcher = MetadataFetcher::new(
        ScriptedChain::new(vec![(0, V1), (20, V2)]),
        Duration::from_secs(1),
    );
    let report = monitor.run([5, 10, 25], &fetcher).await;
    assert_eq!(report.sample_count(), 3);
    assert_eq!(report.changes.len(), 1);
    assert_eq!(report.changes[0].block, 25);
}

#[tokio::test]
async fn report_json_shape() {
    let chain = ScriptedChain::new(vec![(0, V1)]);
    let report = builder(1, 2, 1).build().unwrap().audit(chain).await.unwrap();
    let json = serde_json::to_value(&report).unwrap();

    for key in [
        "address",
        "rpc",
        "chain_id",
        "from_block",
        "to_block",
        "step",
        "metadata",
        "changes_detected",
        "elapsed_seconds",
    ] {
        assert!(json.get(key).is_some(), "missing key {key}");
    }
    assert_eq!(json["address"], "0x5fbdb2315678afecb367f032d93f642f64180aa3");
    assert_eq!(json["metadata"][0]["size"], V1.len());
    assert_eq!(json["metadata"][1]["block"], 2);
    assert_eq!(json["changes_detected"], false);
}

#[tokio::test]
async fn report_names_the_client_endpoint_when_none_configured() {
    let monitor = MonitorBuilder::new(address())
        .from_block(1)
        .to_block(2)
        .step(1)
        .timeout(Duration::from_secs(1))
        .build()
        .unwrap();
    let report = monitor.audit(ScriptedChain::new(vec![(0, V1)])).await.unwrap();
    assert_eq!(report.rpc_endpoint, "scripted://chain");

    let configured = builder(1, 2, 1)
        .rpc_endpoint("http://archive.local:8545")
        .build()
        .unwrap()
        .audit(ScriptedChain::new(vec![(0, V1)]))
        .await
        .unwrap();
    assert_eq!(configured.rpc_endpoint, "http://archive.local:8545");
}
