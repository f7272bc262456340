//! # Inbound Ports
//!
//! API trait defining what the Merkle forest can do.

use async_trait::async_trait;

use super::outbound::{BlockFactory, ConsensusGate};
use crate::domain::{
    ForestConfig, ForestError, ForestRoot, Hash, IngestReceipt, RebalanceMove, ShardId,
    SyncOutcome, TransferReceipt,
};

/// Merkle forest API - inbound port.
#[async_trait]
pub trait MerkleForestApi: Send + Sync {
    /// Get the forest configuration.
    fn config(&self) -> &ForestConfig;

    /// Fixed number of shards.
    fn shard_count(&self) -> u16;

    /// Block counts per shard, in shard order.
    fn block_counts(&self) -> Vec<usize>;

    /// Shard with the lowest load score (ties: lowest index).
    fn select_target_shard(&self) -> ShardId;

    /// Mine, decide and append `data` to the least loaded shard, then
    /// rebalance and synchronize the neighbor.
    async fn ingest(
        &self,
        data: Vec<u8>,
        validator: &str,
        factory: &dyn BlockFactory,
        gate: &dyn ConsensusGate,
    ) -> Result<IngestReceipt, ForestError>;

    /// Move one tail block if a shard exceeds capacity and the load gap is
    /// greater than one.
    fn maybe_rebalance(&self) -> Result<Option<RebalanceMove>, ForestError>;

    /// Prove the source tail and copy it into the next shard.
    fn synchronize_neighbor_shard(&self, source: ShardId) -> Result<SyncOutcome, ForestError>;

    /// Authenticated move of the tail of `from` onto `to`.
    fn transfer_tail(&self, from: ShardId, to: ShardId) -> Result<TransferReceipt, ForestError>;

    /// Recompute every shard root.
    fn global_recompute_roots(&self) -> Result<(), ForestError>;

    /// Inclusion proof for a block.
    fn prove_inclusion(&self, shard: ShardId, block_index: usize) -> Result<Vec<Hash>, ForestError>;

    /// Check an inclusion proof against the shard's current root.
    fn verify_inclusion(
        &self,
        shard: ShardId,
        block_index: usize,
        proof: &[Hash],
    ) -> Result<bool, ForestError>;

    /// Presence filter lookup.
    fn contains_hash(&self, shard: ShardId, hash: &Hash) -> Result<bool, ForestError>;

    /// XOR of the shard's block hashes.
    fn accumulator_snapshot(&self, shard: ShardId) -> Result<[u8; 32], ForestError>;

    /// Current root of a shard.
    fn merkle_root(&self, shard: ShardId) -> Result<Option<Hash>, ForestError>;

    /// Root over every shard root.
    fn forest_root(&self) -> Result<ForestRoot, ForestError>;
}
