//! # Forest Root Computation
//!
//! Hash tree over shard roots in shard order. Empty shards contribute the
//! all-zero hash so that every shard occupies a fixed leaf position.

use super::hash_tree::build_root;
use crate::domain::{ForestError, ForestRoot, ShardRootEntry, ZERO_HASH};

/// Compute the forest root from per-shard entries.
///
/// Entries are sorted by shard ID first.
pub fn compute_forest_root(entries: &[ShardRootEntry]) -> Result<ForestRoot, ForestError> {
    let mut sorted = entries.to_vec();
    sorted.sort_by_key(|entry| entry.shard_id);

    let leaves: Vec<_> = sorted
        .iter()
        .map(|entry| entry.root.unwrap_or(ZERO_HASH))
        .collect();
    let root = build_root(&leaves)?;

    Ok(ForestRoot {
        root,
        shards: sorted,
    })
}
