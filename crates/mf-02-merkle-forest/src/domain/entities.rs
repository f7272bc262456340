//! # Domain Entities
//!
//! Blocks and the durable per-shard record.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::errors::{Hash, ShardId};

/// A block owned by exactly one shard at a time.
///
/// `hash` is a deterministic hash of every other field, and `prev_hash`
/// equals the hash of the preceding block in the same shard (`None` for a
/// genesis block).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Shard-local sequence number, 0 for genesis.
    pub index: u64,
    /// Creation time in milliseconds.
    pub timestamp: u64,
    /// Opaque payload.
    pub data: Vec<u8>,
    /// Hash of the preceding block in the same shard.
    pub prev_hash: Option<Hash>,
    /// Content hash including `nonce` and `validator`.
    pub hash: Hash,
    /// Proof-of-work witness.
    pub nonce: u64,
    /// Identifier of the approving party.
    pub validator: String,
}

impl Block {
    /// Create a block and compute its hash.
    pub fn new(
        index: u64,
        timestamp: u64,
        data: Vec<u8>,
        prev_hash: Option<Hash>,
        nonce: u64,
        validator: impl Into<String>,
    ) -> Self {
        let mut block = Self {
            index,
            timestamp,
            data,
            prev_hash,
            hash: [0u8; 32],
            nonce,
            validator: validator.into(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// Deterministic genesis block for a shard.
    pub fn genesis(shard_id: ShardId) -> Self {
        Self::new(
            0,
            0,
            format!("Genesis Block {}", shard_id).into_bytes(),
            None,
            0,
            "genesis",
        )
    }

    /// SHA-256 over every field except `hash`.
    ///
    /// Variable-length fields are length-prefixed so distinct field splits
    /// never collide.
    pub fn compute_hash(&self) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.index.to_be_bytes());
        hasher.update(self.timestamp.to_be_bytes());
        hasher.update((self.data.len() as u64).to_be_bytes());
        hasher.update(&self.data);
        match &self.prev_hash {
            Some(prev) => {
                hasher.update([1u8]);
                hasher.update(prev);
            }
            None => hasher.update([0u8]),
        }
        hasher.update(self.nonce.to_be_bytes());
        hasher.update((self.validator.len() as u64).to_be_bytes());
        hasher.update(self.validator.as_bytes());

        let result = hasher.finalize();
        let mut output = [0u8; 32];
        output.copy_from_slice(&result);
        output
    }

    /// Check that the stored hash matches the content.
    pub fn verify_hash(&self) -> bool {
        self.hash == self.compute_hash()
    }

    /// A genesis block has no predecessor.
    pub fn is_genesis(&self) -> bool {
        self.prev_hash.is_none()
    }

    /// Re-chain this block's payload onto `parent` (or as a genesis block).
    ///
    /// Returns a new block: timestamp, data, nonce and validator are carried
    /// over, index and `prev_hash` follow `parent`, and the hash is
    /// recomputed. `self` is left untouched.
    pub fn relink(&self, parent: Option<&Block>) -> Block {
        Block::new(
            parent.map_or(0, |p| p.index + 1),
            self.timestamp,
            self.data.clone(),
            parent.map(|p| p.hash),
            self.nonce,
            self.validator.clone(),
        )
    }
}

/// Where a block landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRef {
    /// Owning shard.
    pub shard_id: ShardId,
    /// Position in the shard's block list.
    pub position: usize,
    /// Block hash.
    pub hash: Hash,
}

/// Minimal durable record of a shard.
///
/// Sufficient to rebuild the presence filter and accumulator by replay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardRecord {
    /// Shard the record belongs to.
    pub shard_id: ShardId,
    /// Ordered blocks.
    pub blocks: Vec<Block>,
    /// Root at export time (None for an empty shard).
    pub merkle_root: Option<Hash>,
}
