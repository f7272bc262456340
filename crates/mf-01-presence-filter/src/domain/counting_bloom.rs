//! # Counting Bloom Filter
//!
//! Shards lose their tail block on rebalance and transfer, so the
//! probabilistic presence filter must support removal. Bits are replaced
//! with 4-bit counters:
//! - Add: increment counters at hashed positions
//! - Remove: decrement counters at hashed positions
//! - Membership: true if all counters > 0
//!
//! A counter that reaches `MAX_COUNTER` becomes sticky: it is never
//! decremented again, because its true count is no longer known. Sticky
//! counters can only add false positives, never false negatives.

use super::hash_functions::compute_hash_positions;
use super::parameters::{predicted_fpr, CounterSizing};
use super::presence::PresenceFilter;

/// Maximum counter value (4-bit = 15).
const MAX_COUNTER: u8 = 15;

/// Counting Bloom Filter with 4-bit counters packed two per byte.
#[derive(Clone, Debug)]
pub struct CountingBloomFilter {
    counters: Vec<u8>,
    /// Number of hash functions
    k: usize,
    /// Size in counters (not bytes)
    m: usize,
    /// Live insertions
    n: usize,
    /// Tweak for hash variation
    tweak: u32,
}

impl CountingBloomFilter {
    /// Create a new counting Bloom filter with `m` counters and `k` hashes.
    pub fn new(m: usize, k: usize) -> Self {
        Self::new_with_tweak(m, k, 0)
    }

    /// Create with a specific tweak.
    pub fn new_with_tweak(m: usize, k: usize, tweak: u32) -> Self {
        let m = m.max(1);
        Self {
            counters: vec![0u8; m.div_ceil(2)],
            k: k.max(1),
            m,
            n: 0,
            tweak,
        }
    }

    /// Create with optimal parameters for `expected_elements` at `target_fpr`.
    pub fn with_fpr(expected_elements: usize, target_fpr: f64) -> Self {
        let sizing = CounterSizing::for_target(expected_elements, target_fpr);
        Self::new(sizing.counters, sizing.hash_count)
    }

    fn get_counter(&self, pos: usize) -> u8 {
        let byte_idx = pos / 2;
        if pos % 2 == 0 {
            self.counters[byte_idx] >> 4
        } else {
            self.counters[byte_idx] & 0x0F
        }
    }

    fn set_counter(&mut self, pos: usize, value: u8) {
        let byte_idx = pos / 2;
        if pos % 2 == 0 {
            self.counters[byte_idx] = (self.counters[byte_idx] & 0x0F) | (value << 4);
        } else {
            self.counters[byte_idx] = (self.counters[byte_idx] & 0xF0) | value;
        }
    }

    fn increment(&mut self, pos: usize) {
        let current = self.get_counter(pos);
        if current < MAX_COUNTER {
            self.set_counter(pos, current + 1);
        }
    }

    fn decrement(&mut self, pos: usize) {
        let current = self.get_counter(pos);
        // Sticky at MAX_COUNTER, floor at 0
        if current > 0 && current < MAX_COUNTER {
            self.set_counter(pos, current - 1);
        }
    }

    /// Number of counters (m).
    pub fn size_counters(&self) -> usize {
        self.m
    }

    /// Get size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.counters.len()
    }

    /// Get number of hash functions.
    pub fn hash_count(&self) -> usize {
        self.k
    }

    /// Current false positive rate estimate for the live element count.
    pub fn false_positive_rate(&self) -> f64 {
        predicted_fpr(self.m, self.n, self.k)
    }
}

impl PresenceFilter for CountingBloomFilter {
    fn insert(&mut self, element: &[u8]) {
        for pos in compute_hash_positions(element, self.k, self.m, self.tweak) {
            self.increment(pos);
        }
        self.n += 1;
    }

    fn remove(&mut self, element: &[u8]) {
        // Decrementing for an absent element could zero a counter that a
        // present element relies on.
        if !self.contains(element) {
            return;
        }
        for pos in compute_hash_positions(element, self.k, self.m, self.tweak) {
            self.decrement(pos);
        }
        self.n = self.n.saturating_sub(1);
    }

    fn contains(&self, element: &[u8]) -> bool {
        compute_hash_positions(element, self.k, self.m, self.tweak)
            .iter()
            .all(|&pos| self.get_counter(pos) > 0)
    }

    fn clear(&mut self) {
        self.counters.fill(0);
        self.n = 0;
    }

    fn len(&self) -> usize {
        self.n
    }

    fn is_probabilistic(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(i: u32) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[..4].copy_from_slice(&i.to_be_bytes());
        bytes
    }

    #[test]
    fn test_add_and_contains() {
        let mut filter = CountingBloomFilter::new(1000, 7);

        filter.insert(&element(1));
        assert!(filter.contains(&element(1)));
        assert!(filter.is_probabilistic());
    }

    #[test]
    fn test_remove() {
        let mut filter = CountingBloomFilter::new(1000, 7);

        filter.insert(&element(1));
        filter.insert(&element(2));
        filter.remove(&element(1));

        assert!(!filter.contains(&element(1)));
        assert!(filter.contains(&element(2)));
        assert_eq!(filter.len(), 1);
    }

    #[test]
    fn test_no_false_negatives_bulk() {
        let mut filter = CountingBloomFilter::with_fpr(500, 0.01);
        for i in 0..500 {
            filter.insert(&element(i));
        }
        // Remove every other element; the rest must stay visible
        for i in (0..500).step_by(2) {
            filter.remove(&element(i));
        }
        for i in (1..500).step_by(2) {
            assert!(filter.contains(&element(i)), "False negative for {}", i);
        }
    }

    #[test]
    fn test_saturated_counters_never_cause_false_negatives() {
        // Tiny filter so every element shares counters
        let mut filter = CountingBloomFilter::new(4, 2);
        for i in 0..40 {
            filter.insert(&element(i));
        }
        for i in 0..39 {
            filter.remove(&element(i));
        }

        assert!(filter.contains(&element(39)));
    }

    #[test]
    fn test_false_positive_rate_bounded() {
        let target_fpr = 0.01;
        let mut filter = CountingBloomFilter::with_fpr(200, target_fpr);
        for i in 0..200 {
            filter.insert(&element(i));
        }

        let mut false_positives = 0;
        for i in 10_000..30_000 {
            if filter.contains(&element(i)) {
                false_positives += 1;
            }
        }
        let actual_fpr = false_positives as f64 / 20_000.0;

        // Allow 2x statistical tolerance
        assert!(
            actual_fpr <= target_fpr * 2.0,
            "Actual FPR {} exceeds 2 * target {}",
            actual_fpr,
            target_fpr
        );
    }

    #[test]
    fn test_4bit_packing() {
        let filter = CountingBloomFilter::new(100, 5);

        assert_eq!(filter.size_bytes(), 50);
        assert_eq!(filter.size_counters(), 100);
    }

    #[test]
    fn test_clear() {
        let mut filter = CountingBloomFilter::new(100, 3);
        filter.insert(&element(9));
        filter.clear();

        assert!(filter.is_empty());
        assert!(!filter.contains(&element(9)));
        assert_eq!(filter.false_positive_rate(), 0.0);
    }
}
