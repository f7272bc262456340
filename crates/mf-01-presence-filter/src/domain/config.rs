//! Presence filter configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use mf_01_presence_filter::PresenceFilterConfig;
//!
//! let config = PresenceFilterConfig::counting_bloom(10_000, 0.01);
//! config.validate()?;
//! let filter = config.build()?;
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::counting_bloom::CountingBloomFilter;
use super::exact_set::ExactSetFilter;
use super::presence::PresenceFilter;
use crate::error::FilterError;

/// Which presence filter a shard uses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PresenceFilterConfig {
    /// Exact multiset of hashes.
    #[default]
    ExactSet,
    /// Counting Bloom filter sized for `expected_elements` at `target_fpr`.
    CountingBloom {
        /// Expected number of live hashes per shard
        expected_elements: usize,
        /// Target false positive rate at that load
        target_fpr: f64,
    },
}

impl PresenceFilterConfig {
    /// Counting Bloom variant.
    pub fn counting_bloom(expected_elements: usize, target_fpr: f64) -> Self {
        Self::CountingBloom {
            expected_elements,
            target_fpr,
        }
    }

    /// Validate sizing parameters.
    pub fn validate(&self) -> Result<(), FilterError> {
        match self {
            Self::ExactSet => Ok(()),
            Self::CountingBloom {
                expected_elements,
                target_fpr,
            } => {
                if *expected_elements == 0 {
                    return Err(FilterError::InvalidParameters(
                        "expected_elements cannot be 0".to_string(),
                    ));
                }
                if !(*target_fpr > 0.0 && *target_fpr < 1.0) {
                    return Err(FilterError::InvalidFPR { fpr: *target_fpr });
                }
                Ok(())
            }
        }
    }

    /// Validate and construct a fresh, empty filter.
    pub fn build(&self) -> Result<Box<dyn PresenceFilter>, FilterError> {
        self.validate()?;
        match self {
            Self::ExactSet => Ok(Box::new(ExactSetFilter::new())),
            Self::CountingBloom {
                expected_elements,
                target_fpr,
            } => {
                let filter = CountingBloomFilter::with_fpr(*expected_elements, *target_fpr);
                debug!(
                    "[mf-01] Counting Bloom filter: m={} k={} for n={} at fpr={}",
                    filter.size_counters(),
                    filter.hash_count(),
                    expected_elements,
                    target_fpr
                );
                Ok(Box::new(filter))
            }
        }
    }
}
