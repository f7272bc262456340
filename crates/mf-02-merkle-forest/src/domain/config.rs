//! Forest configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use mf_02_merkle_forest::ForestConfig;
//!
//! let config = ForestConfig::default()
//!     .with_shard_count(4)
//!     .with_max_shard_capacity(64)
//!     .with_collaborator_timeout_ms(5_000);
//! config.validate()?;
//! ```

use mf_01_presence_filter::PresenceFilterConfig;
use serde::{Deserialize, Serialize};

use super::errors::ForestError;
use super::invariants::{MAX_SHARD_COUNT, MIN_SHARD_COUNT};

/// Load score penalty for shards about to exceed capacity.
pub const DEFAULT_OVERLOAD_PENALTY: usize = 2;

/// Merkle forest configuration.
///
/// `shard_count` is fixed for the forest's lifetime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of shards.
    pub shard_count: u16,
    /// Block count above which rebalancing triggers.
    pub max_shard_capacity: usize,
    /// Added to a shard's load score once it reaches `capacity - 1` blocks.
    pub overload_penalty: usize,
    /// Presence filter used by every shard.
    pub filter: PresenceFilterConfig,
    /// Deadline for each collaborator call; `None` waits indefinitely.
    pub collaborator_timeout_ms: Option<u64>,
    /// Run neighbor synchronization after every accepted ingest.
    pub sync_on_ingest: bool,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            shard_count: 2,
            max_shard_capacity: 5,
            overload_penalty: DEFAULT_OVERLOAD_PENALTY,
            filter: PresenceFilterConfig::ExactSet,
            collaborator_timeout_ms: None,
            sync_on_ingest: true,
        }
    }
}

impl ForestConfig {
    /// Create a validated configuration.
    pub fn new(shard_count: u16, max_shard_capacity: usize) -> Result<Self, ForestError> {
        let config = Self {
            shard_count,
            max_shard_capacity,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Create config for testing.
    pub fn for_testing() -> Self {
        Self {
            shard_count: 4,
            max_shard_capacity: 4,
            overload_penalty: DEFAULT_OVERLOAD_PENALTY,
            filter: PresenceFilterConfig::ExactSet,
            collaborator_timeout_ms: Some(1_000),
            sync_on_ingest: true,
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ForestError> {
        if !(MIN_SHARD_COUNT..=MAX_SHARD_COUNT).contains(&self.shard_count) {
            return Err(ForestError::ConfigError(format!(
                "shard_count must be between {} and {}, got {}",
                MIN_SHARD_COUNT, MAX_SHARD_COUNT, self.shard_count
            )));
        }

        if self.max_shard_capacity == 0 {
            return Err(ForestError::ConfigError(
                "max_shard_capacity cannot be 0".to_string(),
            ));
        }

        if self.collaborator_timeout_ms == Some(0) {
            return Err(ForestError::ConfigError(
                "collaborator_timeout_ms cannot be 0".to_string(),
            ));
        }

        self.filter.validate()?;
        Ok(())
    }

    /// Builder-style method to set the shard count
    pub fn with_shard_count(mut self, shard_count: u16) -> Self {
        self.shard_count = shard_count;
        self
    }

    /// Builder-style method to set the rebalance capacity
    pub fn with_max_shard_capacity(mut self, capacity: usize) -> Self {
        self.max_shard_capacity = capacity;
        self
    }

    /// Builder-style method to set the presence filter
    pub fn with_filter(mut self, filter: PresenceFilterConfig) -> Self {
        self.filter = filter;
        self
    }

    /// Builder-style method to set the collaborator deadline
    pub fn with_collaborator_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.collaborator_timeout_ms = Some(timeout_ms);
        self
    }

    /// Builder-style method to toggle neighbor sync on ingest
    pub fn with_sync_on_ingest(mut self, enabled: bool) -> Self {
        self.sync_on_ingest = enabled;
        self
    }
}
