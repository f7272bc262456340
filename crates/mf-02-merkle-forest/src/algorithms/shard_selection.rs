//! # Shard Selection and Rebalance Planning
//!
//! Greedy O(shard_count) heuristics over block counts. Not a global optimum;
//! shard counts are small and rebalancing corrects drift.

use crate::domain::ShardId;

/// Load score of a shard.
///
/// The block count, plus `penalty` once the shard reaches `capacity - 1`
/// blocks, so writes move elsewhere before the hard rebalance trigger.
pub fn load_score(block_count: usize, capacity: usize, penalty: usize) -> usize {
    if block_count >= capacity.saturating_sub(1) {
        block_count + penalty
    } else {
        block_count
    }
}

/// Shard with the minimum load score; ties go to the lowest index.
pub fn select_target_shard(counts: &[usize], capacity: usize, penalty: usize) -> Option<ShardId> {
    counts
        .iter()
        .enumerate()
        .min_by_key(|(index, count)| (load_score(**count, capacity, penalty), *index))
        .map(|(index, _)| index as ShardId)
}

/// Planned single tail move from the most to the least loaded shard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RebalancePlan {
    /// Most loaded shard (lowest index on ties).
    pub from: ShardId,
    /// Least loaded shard (lowest index on ties).
    pub to: ShardId,
}

/// Plan one move if any shard exceeds `capacity` and the max-min gap is
/// greater than one.
pub fn plan_rebalance(counts: &[usize], capacity: usize) -> Option<RebalancePlan> {
    if !counts.iter().any(|&count| count > capacity) {
        return None;
    }

    let (max_index, max_count) = counts
        .iter()
        .enumerate()
        .min_by_key(|(index, count)| (std::cmp::Reverse(**count), *index))?;
    let (min_index, min_count) = counts
        .iter()
        .enumerate()
        .min_by_key(|(index, count)| (**count, *index))?;

    if max_index != min_index && max_count - min_count > 1 {
        Some(RebalancePlan {
            from: max_index as ShardId,
            to: min_index as ShardId,
        })
    } else {
        None
    }
}
