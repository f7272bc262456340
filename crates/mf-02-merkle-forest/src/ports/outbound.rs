//! # Outbound Ports
//!
//! Collaborators the forest consumes but does not implement: block mining
//! and the consensus decision.

use async_trait::async_trait;

use crate::domain::{Block, ForestError};

/// Block factory - outbound port.
///
/// Produces a mined candidate chained to `prev`. The returned block's
/// `prev_hash` must equal `prev.hash`; its proof-of-work predicate is opaque
/// to the forest.
#[async_trait]
pub trait BlockFactory: Send + Sync {
    /// Mine a candidate block on top of `prev`.
    async fn mine(&self, prev: &Block, data: &[u8], validator: &str) -> Result<Block, ForestError>;
}

/// Consensus gate - outbound port.
///
/// Treated as a pure boolean oracle per call. Implementations may keep
/// internal state (reputation, vote history) the forest never sees.
#[async_trait]
pub trait ConsensusGate: Send + Sync {
    /// Accept (`true`) or reject (`false`) a candidate block.
    async fn decide(&self, candidate: &Block) -> bool;
}
