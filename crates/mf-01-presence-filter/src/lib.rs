//! # MF-01 Presence Filter
//!
//! Answers "has this hash been seen in this shard" for the Merkle forest.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Pure data structures, no I/O
//!   - `PresenceFilter`: the capability every shard consumes
//!   - `ExactSetFilter`: reference behavior, no false positives or negatives
//!   - `CountingBloomFilter`: space-bounded probabilistic variant
//!   - `PresenceFilterConfig`: selects and validates a variant
//!
//! ## Invariants
//!
//! - **No false negatives**: once inserted (and not removed), `contains()` MUST
//!   return true, for every variant.
//! - Counting Bloom FPR = (1 - e^(-kn/m))^k <= target_fpr at the configured
//!   element count.
//!
//! ## Usage Example
//!
//! ```ignore
//! use mf_01_presence_filter::PresenceFilterConfig;
//!
//! let mut filter = PresenceFilterConfig::counting_bloom(1_000, 0.01).build()?;
//! filter.insert(&[0xAB; 32]);
//! assert!(filter.contains(&[0xAB; 32]));
//! ```

#![warn(missing_docs)]

pub mod domain;
pub mod error;

pub use domain::{
    predicted_fpr, CountingBloomFilter, CounterSizing, ExactSetFilter, PresenceFilter,
    PresenceFilterConfig, MAX_HASH_COUNT,
};
pub use error::FilterError;
