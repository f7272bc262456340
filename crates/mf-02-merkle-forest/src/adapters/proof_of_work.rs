//! Proof-of-Work Block Factory
//!
//! Implements `BlockFactory` with a leading-zero-bits difficulty predicate
//! and a logical clock, so mined blocks are reproducible.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{Block, ForestError, Hash};
use crate::ports::outbound::BlockFactory;

/// Nonce search bound before giving up.
const MAX_NONCE_ATTEMPTS: u64 = 1 << 32;

/// Nonces tried between yields to the runtime.
const YIELD_INTERVAL: u64 = 1 << 10;

/// Proof-of-work miner with deterministic timestamps.
pub struct ProofOfWorkFactory {
    /// Required leading zero bits in the block hash.
    difficulty_bits: u32,
    /// Next timestamp to assign.
    clock: AtomicU64,
}

impl ProofOfWorkFactory {
    /// Create a factory; the first mined block gets `start_timestamp`.
    pub fn new(difficulty_bits: u32, start_timestamp: u64) -> Self {
        Self {
            difficulty_bits: difficulty_bits.min(64),
            clock: AtomicU64::new(start_timestamp),
        }
    }

    /// Difficulty in leading zero bits.
    pub fn difficulty_bits(&self) -> u32 {
        self.difficulty_bits
    }

    /// Whether `hash` meets the difficulty.
    pub fn meets_difficulty(&self, hash: &Hash) -> bool {
        leading_zero_bits(hash) >= self.difficulty_bits
    }
}

impl Default for ProofOfWorkFactory {
    fn default() -> Self {
        Self::new(8, 1)
    }
}

fn leading_zero_bits(hash: &Hash) -> u32 {
    let mut bits = 0;
    for byte in hash {
        if *byte == 0 {
            bits += 8;
        } else {
            bits += byte.leading_zeros();
            break;
        }
    }
    bits
}

#[async_trait]
impl BlockFactory for ProofOfWorkFactory {
    async fn mine(&self, prev: &Block, data: &[u8], validator: &str) -> Result<Block, ForestError> {
        let timestamp = self.clock.fetch_add(1, Ordering::SeqCst);
        let mut block = Block::new(
            prev.index + 1,
            timestamp,
            data.to_vec(),
            Some(prev.hash),
            0,
            validator,
        );

        for nonce in 0..MAX_NONCE_ATTEMPTS {
            // Yield so a caller's deadline can fire and drop the search.
            if nonce > 0 && nonce % YIELD_INTERVAL == 0 {
                tokio::task::yield_now().await;
            }
            block.nonce = nonce;
            block.hash = block.compute_hash();
            if self.meets_difficulty(&block.hash) {
                debug!(
                    "[mf-02] Mined block {} with nonce {} ({:02x}{:02x}...)",
                    block.index, nonce, block.hash[0], block.hash[1]
                );
                return Ok(block);
            }
        }

        Err(ForestError::BlockFactory(format!(
            "No nonce found for difficulty {} within {} attempts",
            self.difficulty_bits, MAX_NONCE_ATTEMPTS
        )))
    }
}
