//! The presence filter capability.

use std::fmt::Debug;

/// Membership structure for the block hashes held by one shard.
///
/// Implementations may report false positives but must never report a false
/// negative for an element that was inserted and not since removed.
pub trait PresenceFilter: Debug + Send + Sync {
    /// Record an element.
    fn insert(&mut self, element: &[u8]);

    /// Forget one previously inserted occurrence of an element.
    ///
    /// Callers must only remove elements they inserted. Exact filters ignore
    /// unknown elements; probabilistic filters cannot always tell them apart
    /// from false positives.
    fn remove(&mut self, element: &[u8]);

    /// Test membership.
    fn contains(&self, element: &[u8]) -> bool;

    /// Drop every element.
    fn clear(&mut self);

    /// Number of live insertions (inserts minus removes).
    fn len(&self) -> usize;

    /// True when nothing is recorded.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `contains` can return true for elements never inserted.
    fn is_probabilistic(&self) -> bool;
}
