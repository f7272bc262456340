//! # Algorithms Module
//!
//! Pure functions: hash tree, accumulator, load-based shard selection and
//! the forest root.

pub mod accumulator;
pub mod forest_root;
pub mod hash_tree;
pub mod shard_selection;

pub use accumulator::{xor_fold, ACCUMULATOR_WIDTH};
pub use forest_root::compute_forest_root;
pub use hash_tree::{
    build_proof, build_root, compress_proof, fingerprint_matches, hash_pair, verify_proof,
};
pub use shard_selection::{load_score, plan_rebalance, select_target_shard, RebalancePlan};
