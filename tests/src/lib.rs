//! # Merkle Forest Test Suite
//!
//! Unified test crate for flows that cross crate boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── forest_flows.rs   # Ingest, rejection, timeouts, rebalance, transfer
//!     └── concurrency.rs    # Shared forest under parallel load
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p mf-tests
//! cargo test -p mf-tests integration::concurrency
//! ```

pub mod integration;
