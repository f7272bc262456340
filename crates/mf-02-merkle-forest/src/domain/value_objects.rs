//! # Domain Value Objects
//!
//! Immutable receipts and summaries returned by forest operations.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entities::BlockRef;
use super::errors::{Hash, ShardId};

/// Four-byte prefix of a proof sibling hash.
pub type ProofFingerprint = [u8; 4];

/// Shard lifecycle.
///
/// `Empty → (genesis append) → NonEmpty`; `NonEmpty → (append) → NonEmpty`;
/// `NonEmpty → (rebalance-out | transfer-out) → NonEmpty | Empty`. There is
/// no terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShardLifecycle {
    /// No blocks.
    Empty,
    /// At least one block.
    NonEmpty,
}

/// A single tail move performed by rebalancing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebalanceMove {
    /// Most loaded shard.
    pub from: ShardId,
    /// Least loaded shard.
    pub to: ShardId,
    /// Hash of the block removed from `from`.
    pub moved_hash: Hash,
    /// The block as re-chained onto `to`.
    pub relinked: BlockRef,
}

/// Why a neighbor synchronization did nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The forest has one shard, which is its own neighbor.
    SingleShard,
    /// The source shard holds no blocks.
    EmptySource,
    /// Synchronization on ingest is turned off.
    Disabled,
}

/// Result of a neighbor synchronization pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncOutcome {
    /// Source tail was proven and copied into the neighbor.
    Replicated {
        /// Source shard.
        source: ShardId,
        /// Neighbor shard.
        target: ShardId,
        /// Hash of the proven source tail.
        source_hash: Hash,
        /// Copy appended to the neighbor.
        replica: BlockRef,
    },
    /// Proof failed against the source root; nothing was mutated.
    Aborted {
        /// Source shard.
        source: ShardId,
        /// Neighbor shard.
        target: ShardId,
        /// Position of the tail whose proof failed.
        block_index: usize,
    },
    /// No synchronization was attempted.
    Skipped {
        /// Source shard.
        source: ShardId,
        /// Why.
        reason: SkipReason,
    },
}

impl SyncOutcome {
    /// True when a replica was appended.
    pub fn is_replicated(&self) -> bool {
        matches!(self, Self::Replicated { .. })
    }
}

/// Outcome of an accepted ingest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReceipt {
    /// Correlation ID for logs.
    pub request_id: Uuid,
    /// Where the accepted block was appended. A rebalance in the same call
    /// may have moved it afterwards; see `rebalanced`.
    pub block: BlockRef,
    /// Rebalance move triggered by this ingest, if any.
    pub rebalanced: Option<RebalanceMove>,
    /// Neighbor synchronization result.
    pub sync: SyncOutcome,
}

/// Outcome of an authenticated tail transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    /// Source shard.
    pub from: ShardId,
    /// Destination shard.
    pub to: ShardId,
    /// Hash of the block as proven in `from`.
    pub source_hash: Hash,
    /// Number of sibling hashes in the proof.
    pub proof_len: usize,
    /// Compressed proof, for audit logs.
    pub proof_fingerprint: Vec<ProofFingerprint>,
    /// The block as re-chained onto `to`.
    pub relinked: BlockRef,
}

/// Root and size of one shard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardRootEntry {
    /// Shard ID.
    pub shard_id: ShardId,
    /// Merkle root (None when empty).
    pub root: Option<Hash>,
    /// Number of blocks.
    pub block_count: usize,
}

/// Root over every shard root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestRoot {
    /// Hash tree root over shard roots in shard order.
    pub root: Hash,
    /// Per-shard entries in shard order.
    pub shards: Vec<ShardRootEntry>,
}

impl ForestRoot {
    /// Total blocks across all shards.
    pub fn total_blocks(&self) -> usize {
        self.shards.iter().map(|s| s.block_count).sum()
    }
}
