//! # Domain Invariants
//!
//! Rules that must always hold for a forest.

use super::entities::Block;
use super::errors::{ForestError, Hash};
use crate::algorithms::hash_tree::build_root;

/// Minimum shard count.
pub const MIN_SHARD_COUNT: u16 = 1;

/// Maximum shard count.
pub const MAX_SHARD_COUNT: u16 = 1024;

/// Invariant: every block hashes to its stored hash and links to its
/// predecessor; only the first block may be a genesis block.
pub fn invariant_chain_linkage(blocks: &[Block]) -> Result<(), ForestError> {
    for (position, block) in blocks.iter().enumerate() {
        if !block.verify_hash() {
            return Err(ForestError::StateInconsistency(format!(
                "Block at position {} has a stale hash",
                position
            )));
        }

        let expected = if position == 0 {
            None
        } else {
            Some(blocks[position - 1].hash)
        };
        if block.prev_hash != expected {
            return Err(ForestError::StateInconsistency(format!(
                "Block at position {} does not link to its predecessor",
                position
            )));
        }
    }
    Ok(())
}

/// Invariant: the stored root equals a root recomputed from scratch.
pub fn invariant_root_matches(blocks: &[Block], root: Option<Hash>) -> Result<(), ForestError> {
    let hashes: Vec<Hash> = blocks.iter().map(|b| b.hash).collect();
    let expected = if hashes.is_empty() {
        None
    } else {
        Some(build_root(&hashes)?)
    };

    if expected != root {
        return Err(ForestError::StateInconsistency(
            "Stored Merkle root does not match block sequence".to_string(),
        ));
    }
    Ok(())
}

/// Invariant: blocks are neither lost nor duplicated.
///
/// `created` counts blocks legitimately added in the interval, including
/// neighbor replicas.
pub fn invariant_conservation(before: usize, after: usize, created: usize) -> Result<(), ForestError> {
    if after != before + created {
        return Err(ForestError::StateInconsistency(format!(
            "Block count {} -> {} with {} created",
            before, after, created
        )));
    }
    Ok(())
}

/// Invariant: no two shards differ by more than `tolerance` blocks.
pub fn invariant_balanced(counts: &[usize], tolerance: usize) -> Result<(), ForestError> {
    let (Some(max), Some(min)) = (counts.iter().max(), counts.iter().min()) else {
        return Ok(());
    };
    if max - min > tolerance {
        return Err(ForestError::StateInconsistency(format!(
            "Shard load gap {} exceeds tolerance {}",
            max - min,
            tolerance
        )));
    }
    Ok(())
}
