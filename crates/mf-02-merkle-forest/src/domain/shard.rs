//! # Shard
//!
//! An append-only block sequence with its Merkle root and presence filter.
//!
//! The root is recomputed from scratch after every structural mutation
//! (append, tail removal), which is O(n) per mutation. Shard size is bounded
//! by the forest's rebalance capacity.

use mf_01_presence_filter::{PresenceFilter, PresenceFilterConfig};
use tracing::debug;

use super::entities::{Block, BlockRef, ShardRecord};
use super::errors::{ForestError, Hash, ShardId};
use super::value_objects::ShardLifecycle;
use crate::algorithms::accumulator::{xor_fold, ACCUMULATOR_WIDTH};
use crate::algorithms::hash_tree::{build_proof, build_root, verify_proof};

/// One shard of the forest.
#[derive(Debug)]
pub struct Shard {
    id: ShardId,
    blocks: Vec<Block>,
    merkle_root: Option<Hash>,
    presence: Box<dyn PresenceFilter>,
}

impl Shard {
    /// Create an empty shard backed by `presence`.
    pub fn new(id: ShardId, presence: Box<dyn PresenceFilter>) -> Self {
        Self {
            id,
            blocks: Vec::new(),
            merkle_root: None,
            presence,
        }
    }

    /// Create an empty shard with a filter built from `filter`.
    pub fn with_filter(id: ShardId, filter: &PresenceFilterConfig) -> Result<Self, ForestError> {
        Ok(Self::new(id, filter.build()?))
    }

    /// Rebuild a shard by replaying a record.
    ///
    /// Every block goes through `append`, so linkage and hashes are checked
    /// and the presence filter is repopulated. The replayed root must equal
    /// the recorded one.
    pub fn from_record(
        record: ShardRecord,
        presence: Box<dyn PresenceFilter>,
    ) -> Result<Self, ForestError> {
        let mut shard = Self::new(record.shard_id, presence);
        for block in record.blocks {
            shard.append(block)?;
        }

        if shard.merkle_root != record.merkle_root {
            return Err(ForestError::StateInconsistency(format!(
                "Replayed root for shard {} does not match record",
                record.shard_id
            )));
        }
        Ok(shard)
    }

    /// Export the minimal durable record.
    pub fn to_record(&self) -> ShardRecord {
        ShardRecord {
            shard_id: self.id,
            blocks: self.blocks.clone(),
            merkle_root: self.merkle_root,
        }
    }

    /// Shard ID.
    pub fn id(&self) -> ShardId {
        self.id
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// True when the shard holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks in order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Last block, if any.
    pub fn tail(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Current Merkle root (None when empty).
    pub fn merkle_root(&self) -> Option<Hash> {
        self.merkle_root
    }

    /// Lifecycle state.
    pub fn lifecycle(&self) -> ShardLifecycle {
        if self.blocks.is_empty() {
            ShardLifecycle::Empty
        } else {
            ShardLifecycle::NonEmpty
        }
    }

    /// Block hashes in order.
    pub fn block_hashes(&self) -> Vec<Hash> {
        self.blocks.iter().map(|b| b.hash).collect()
    }

    /// Append a block chained to the current tail.
    ///
    /// An empty shard accepts only a genesis block (no `prev_hash`); a
    /// non-empty one requires `prev_hash == tail.hash`.
    pub fn append(&mut self, block: Block) -> Result<BlockRef, ForestError> {
        let expected = self.tail().map(|tail| tail.hash);
        if block.prev_hash != expected {
            return Err(ForestError::ChainLinkage {
                shard: self.id,
                expected,
                found: block.prev_hash,
            });
        }

        if !block.verify_hash() {
            return Err(ForestError::InvalidBlockHash {
                shard: self.id,
                index: block.index,
            });
        }

        let block_ref = BlockRef {
            shard_id: self.id,
            position: self.blocks.len(),
            hash: block.hash,
        };

        self.presence.insert(&block.hash);
        self.blocks.push(block);
        self.recompute_root()?;

        debug!(
            "[mf-02] Appended {:02x}{:02x}... to shard {} at position {}",
            block_ref.hash[0], block_ref.hash[1], self.id, block_ref.position
        );

        Ok(block_ref)
    }

    /// Pop the tail block and recompute the root.
    pub fn remove_tail(&mut self) -> Result<Block, ForestError> {
        let block = self.blocks.pop().ok_or(ForestError::EmptyShard(self.id))?;
        self.presence.remove(&block.hash);
        self.recompute_root()?;

        debug!(
            "[mf-02] Removed tail {:02x}{:02x}... from shard {}",
            block.hash[0], block.hash[1], self.id
        );

        Ok(block)
    }

    /// Inclusion proof for the block at `block_index` against the current root.
    pub fn prove_inclusion(&self, block_index: usize) -> Result<Vec<Hash>, ForestError> {
        build_proof(&self.block_hashes(), block_index)
    }

    /// Check `proof` for the block at `block_index` against the current root.
    ///
    /// A mismatch is `Ok(false)`; only an invalid position is an error.
    pub fn verify_inclusion(&self, block_index: usize, proof: &[Hash]) -> Result<bool, ForestError> {
        let block = self
            .blocks
            .get(block_index)
            .ok_or(ForestError::IndexOutOfRange {
                index: block_index,
                len: self.blocks.len(),
            })?;

        Ok(match &self.merkle_root {
            Some(root) => verify_proof(&block.hash, block_index, proof, root),
            None => false,
        })
    }

    /// Presence filter lookup.
    pub fn contains_hash(&self, hash: &Hash) -> bool {
        self.presence.contains(hash)
    }

    /// XOR of every block hash.
    pub fn accumulator_snapshot(&self) -> [u8; ACCUMULATOR_WIDTH] {
        xor_fold(self.blocks.iter().map(|b| &b.hash[..]))
    }

    /// Recompute the root from the current blocks.
    pub fn recompute_root(&mut self) -> Result<(), ForestError> {
        self.merkle_root = if self.blocks.is_empty() {
            None
        } else {
            Some(build_root(&self.block_hashes())?)
        };
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn set_merkle_root(&mut self, root: Option<Hash>) {
        self.merkle_root = root;
    }
}
