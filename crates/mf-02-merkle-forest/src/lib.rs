//! # MF-02 Merkle Forest
//!
//! A fixed set of shards, each an append-only chain of blocks authenticated
//! by its own Merkle root. New data goes to the least loaded shard, overloaded
//! shards shed their tail, and each accepted block is replicated to the next
//! shard after its inclusion proof checks out.
//!
//! ## Ingest Flow
//!
//! ```text
//! data ──→ [select target shard] ──→ BlockFactory::mine ──→ ConsensusGate::decide
//!                                                                   │
//!                                                        accept     ↓      reject
//!                                     [append + root] ←─────────────┴──────────→ ConsensusRejected
//!                                            │
//!                                            ↓
//!                                    [maybe_rebalance]
//!                                            │
//!                                            ↓
//!                        [prove tail ─→ verify ─→ copy to shard (i+1) % n]
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! mf-02-merkle-forest/
//! ├── domain/          # Block, Shard, config, errors, receipts, invariants
//! ├── algorithms/      # Hash tree, accumulator, shard selection, forest root
//! ├── ports/
//! │   ├── inbound.rs   # MerkleForestApi
//! │   └── outbound.rs  # BlockFactory, ConsensusGate
//! ├── adapters/        # Proof-of-work factory, deterministic gates
//! └── service/         # MerkleForest orchestration
//! ```
//!
//! ## Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | Chain linkage | `Shard::append` rejects a block whose `prev_hash` is not the tail hash |
//! | Root consistency | Every mutation recomputes the shard root |
//! | Presence | Filter holds exactly the shard's current hashes |
//! | Conservation | Rebalance and transfer move, never duplicate |
//! | Lock order | Two-shard operations lock the lower index first |

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export main types for convenience
pub use adapters::{ProofOfWorkFactory, ScriptedConsensusGate, StaticConsensusGate};
pub use algorithms::{build_proof, build_root, hash_pair, verify_proof};
pub use domain::{
    Block, BlockRef, ForestConfig, ForestError, ForestRoot, Hash, IngestReceipt, RebalanceMove,
    Shard, ShardId, ShardRecord, SkipReason, SyncOutcome, TransferReceipt,
};
pub use ports::{BlockFactory, ConsensusGate, MerkleForestApi};
pub use service::MerkleForest;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
