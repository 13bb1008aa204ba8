//! Domain types shared across CodeWatch crates.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use tiny_keccak::{Hasher, Keccak};

use crate::error::MonitorError;

/// A 20-byte EVM account address.
///
/// Only the hex format is validated; EIP-55 mixed-case checksums are accepted
/// but not verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; 20]);

impl Address {
    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl FromStr for Address {
    type Err = MonitorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.len() != 40 {
            return Err(MonitorError::InvalidConfiguration(format!(
                "invalid address format '{s}': expected 40 hex digits"
            )));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes).map_err(|e| {
            MonitorError::InvalidConfiguration(format!("invalid address format '{s}': {e}"))
        })?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// keccak256 digest of a contract's runtime bytecode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodeHash([u8; 32]);

impl CodeHash {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Hash deployed code. Empty code has no hash: "nothing deployed" must not
    /// compare equal to any real contract.
    pub fn of_code(code: &[u8]) -> Option<Self> {
        if code.is_empty() {
            return None;
        }
        let mut hasher = Keccak::v256();
        let mut output = [0u8; 32];
        hasher.update(code);
        hasher.finalize(&mut output);
        Some(Self(output))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for CodeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for CodeHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Code metadata observed for one address at one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockMetadata {
    pub block: u64,
    /// Runtime bytecode length in bytes.
    #[serde(rename = "size")]
    pub code_size: usize,
    /// `None` when no code was deployed or the read failed.
    #[serde(rename = "hash")]
    pub code_hash: Option<CodeHash>,
    /// `None` when the read failed.
    pub nonce: Option<u64>,
}

impl BlockMetadata {
    /// Build a record from a successful code + nonce read.
    pub fn from_code(block: u64, code: &[u8], nonce: u64) -> Self {
        Self {
            block,
            code_size: code.len(),
            code_hash: CodeHash::of_code(code),
            nonce: Some(nonce),
        }
    }

    /// The sentinel recorded when a block could not be read.
    pub fn unknown(block: u64) -> Self {
        Self {
            block,
            code_size: 0,
            code_hash: None,
            nonce: None,
        }
    }

    /// Returns `true` if code was deployed at this block.
    pub fn has_code(&self) -> bool {
        self.code_hash.is_some()
    }
}

/// A transition between two consecutive observed code hashes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeChange {
    /// The sampled block at which the new hash was first seen.
    pub block: u64,
    pub previous: Option<CodeHash>,
    pub current: Option<CodeHash>,
}

impl fmt::Display for CodeChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "block {}: {} -> {}",
            self.block,
            HashOrNone(&self.previous),
            HashOrNone(&self.current)
        )
    }
}

/// Displays an optional hash, with `none` standing in for absent code.
pub struct HashOrNone<'a>(pub &'a Option<CodeHash>);

impl fmt::Display for HashOrNone<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(hash) => write!(f, "{hash}"),
            None => f.write_str("none"),
        }
    }
}

/// Outcome of a full monitoring pass.
#[derive(Debug, Clone, Serialize)]
pub struct StabilityReport {
    pub address: Address,
    #[serde(rename = "rpc")]
    pub rpc_endpoint: String,
    pub chain_id: Option<u64>,
    pub from_block: u64,
    pub to_block: u64,
    pub step: u64,
    /// One record per sampled block, ascending.
    #[serde(rename = "metadata")]
    pub history: Vec<BlockMetadata>,
    pub changes_detected: bool,
    /// Every flagged transition, in the order they were observed.
    pub changes: Vec<CodeChange>,
    #[serde(serialize_with = "round_to_centis")]
    pub elapsed_seconds: f64,
}

impl StabilityReport {
    /// Number of blocks that were sampled.
    pub fn sample_count(&self) -> usize {
        self.history.len()
    }

    /// Returns `true` if no code change was observed.
    pub fn is_stable(&self) -> bool {
        !self.changes_detected
    }
}

fn round_to_centis<S: Serializer>(secs: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((secs * 100.0).round() / 100.0)
}
