//! # Service Layer
//!
//! Stateful orchestration over the shards.

pub mod forest;

pub use forest::MerkleForest;
