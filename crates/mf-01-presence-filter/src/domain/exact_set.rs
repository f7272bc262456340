//! Exact multiset filter.
//!
//! Reference behavior for shard presence checks: a hash map of element to
//! occurrence count, so removing one copy of a duplicated element keeps the
//! others visible.

use std::collections::HashMap;

use super::presence::PresenceFilter;

/// Exact presence filter with no false positives and no false negatives.
#[derive(Clone, Debug, Default)]
pub struct ExactSetFilter {
    counts: HashMap<Vec<u8>, usize>,
    total: usize,
}

impl ExactSetFilter {
    /// Create an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct elements.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }
}

impl PresenceFilter for ExactSetFilter {
    fn insert(&mut self, element: &[u8]) {
        *self.counts.entry(element.to_vec()).or_insert(0) += 1;
        self.total += 1;
    }

    fn remove(&mut self, element: &[u8]) {
        if let Some(count) = self.counts.get_mut(element) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(element);
            }
            self.total -= 1;
        }
    }

    fn contains(&self, element: &[u8]) -> bool {
        self.counts.contains_key(element)
    }

    fn clear(&mut self) {
        self.counts.clear();
        self.total = 0;
    }

    fn len(&self) -> usize {
        self.total
    }

    fn is_probabilistic(&self) -> bool {
        false
    }
}
