//! Domain Layer - Pure data structures
//!
//! This layer contains:
//! - The `PresenceFilter` capability
//! - Exact multiset filter
//! - Counting Bloom filter (removal-capable)
//! - Hash functions and parameter calculations
//! - Configuration
//!
//! RULES:
//! - No I/O operations
//! - No async code

pub mod config;
pub mod counting_bloom;
pub mod exact_set;
pub mod hash_functions;
pub mod parameters;
pub mod presence;

pub use config::PresenceFilterConfig;
pub use counting_bloom::CountingBloomFilter;
pub use exact_set::ExactSetFilter;
pub use parameters::{predicted_fpr, CounterSizing, MAX_HASH_COUNT};
pub use presence::PresenceFilter;
