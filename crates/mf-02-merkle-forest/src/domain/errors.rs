//! # Domain Errors
//!
//! Error types for the Merkle forest.
//!
//! Local invariant violations (`EmptyInput`, `IndexOutOfRange`, `EmptyShard`,
//! `ChainLinkage`) are surfaced immediately. `ConsensusRejected`,
//! `ProofVerificationFailed` and `UpstreamTimeout` are expected outcomes the
//! caller may retry. Every error is scoped to the operation that raised it.

use mf_01_presence_filter::FilterError;
use thiserror::Error;

/// Shard identifier (u16 supports up to 65536 shards).
pub type ShardId = u16;

/// Hash type (32-byte SHA-256 digest).
pub type Hash = [u8; 32];

/// The all-zero hash, used as the placeholder root of an empty shard.
pub const ZERO_HASH: Hash = [0u8; 32];

fn link(hash: &Option<Hash>) -> String {
    match hash {
        Some(h) => hex::encode(h),
        None => "<genesis>".to_string(),
    }
}

/// Merkle forest error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForestError {
    /// Tree requested over zero leaves.
    #[error("Cannot build a hash tree over zero leaves")]
    EmptyInput,

    /// Proof requested or verified for a non-existent position.
    #[error("Index {index} out of range for {len} leaves")]
    IndexOutOfRange {
        /// Requested position
        index: usize,
        /// Number of leaves
        len: usize,
    },

    /// Removal from a shard with no blocks.
    #[error("Shard {0} is empty")]
    EmptyShard(ShardId),

    /// Append with a `prev_hash` that does not match the shard tail.
    #[error(
        "Chain linkage broken on shard {shard}: expected prev {}, found {}",
        link(.expected),
        link(.found)
    )]
    ChainLinkage {
        /// Shard being appended to
        shard: ShardId,
        /// Hash of the current tail (None for an empty shard)
        expected: Option<Hash>,
        /// `prev_hash` carried by the block
        found: Option<Hash>,
    },

    /// Stored block hash does not match its recomputed content hash.
    #[error("Block {index} for shard {shard} carries an invalid hash")]
    InvalidBlockHash {
        /// Target shard
        shard: ShardId,
        /// Block index field
        index: u64,
    },

    /// Unknown shard ID.
    #[error("Unknown shard: {0}")]
    UnknownShard(ShardId),

    /// Consensus gate rejected the candidate block.
    #[error("Block {} rejected by consensus for shard {shard}", hex::encode(.block_hash))]
    ConsensusRejected {
        /// Target shard
        shard: ShardId,
        /// Hash of the rejected candidate
        block_hash: Hash,
    },

    /// Inclusion proof did not reproduce the shard root.
    #[error("Inclusion proof for block {index} failed against shard {shard} root")]
    ProofVerificationFailed {
        /// Shard whose root was checked
        shard: ShardId,
        /// Block position
        index: usize,
    },

    /// Collaborator call exceeded the configured deadline.
    #[error("Upstream {operation} timed out after {timeout_ms}ms")]
    UpstreamTimeout {
        /// Collaborator operation (`mine` or `decide`)
        operation: &'static str,
        /// Deadline that expired
        timeout_ms: u64,
    },

    /// Block factory failed to produce a candidate.
    #[error("Block factory error: {0}")]
    BlockFactory(String),

    /// Transfer with identical source and destination.
    #[error("Cannot transfer within shard {0}")]
    SameShardTransfer(ShardId),

    /// Shard state inconsistency.
    #[error("Shard state inconsistency: {0}")]
    StateInconsistency(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Presence filter configuration error.
    #[error(transparent)]
    Filter(#[from] FilterError),
}

impl ForestError {
    /// True for expected outcomes a caller may retry with new input.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConsensusRejected { .. }
                | Self::ProofVerificationFailed { .. }
                | Self::UpstreamTimeout { .. }
        )
    }
}
