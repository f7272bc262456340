//! Counter sizing for the counting Bloom filter
//!
//! For `n` expected elements and a target rate `p`:
//! - counters  m = ceil(-n * ln(p) / ln(2)^2)
//! - hashes    k = round(m / n * ln(2)), kept within 1..=32
//! - predicted rate (1 - e^(-kn/m))^k

use std::f64::consts::LN_2;

/// Upper bound on hash functions per element.
pub const MAX_HASH_COUNT: usize = 32;

/// Counter count and hash count for a counting Bloom filter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CounterSizing {
    /// Number of 4-bit counters
    pub counters: usize,
    /// Hash functions per element
    pub hash_count: usize,
    /// False positive rate once `expected_elements` are live
    pub predicted_fpr: f64,
}

impl CounterSizing {
    /// Size a filter for `expected_elements` at `target_fpr`.
    ///
    /// Zero elements gives the smallest possible filter.
    pub fn for_target(expected_elements: usize, target_fpr: f64) -> Self {
        if expected_elements == 0 {
            return Self {
                counters: 1,
                hash_count: 1,
                predicted_fpr: 1.0,
            };
        }

        let n = expected_elements as f64;
        let counters = ((-n * target_fpr.ln() / (LN_2 * LN_2)).ceil() as usize).max(1);
        let hash_count = ((counters as f64 / n) * LN_2)
            .round()
            .clamp(1.0, MAX_HASH_COUNT as f64) as usize;

        Self {
            counters,
            hash_count,
            predicted_fpr: predicted_fpr(counters, expected_elements, hash_count),
        }
    }

    /// Backing storage, two counters per byte.
    pub fn bytes(&self) -> usize {
        self.counters.div_ceil(2)
    }
}

/// False positive rate of `counters` counters holding `elements` elements
/// under `hash_count` hashes.
pub fn predicted_fpr(counters: usize, elements: usize, hash_count: usize) -> f64 {
    if counters == 0 {
        return 1.0;
    }
    let fill = -(hash_count as f64) * (elements as f64) / (counters as f64);
    (1.0 - fill.exp()).powi(hash_count as i32)
}
