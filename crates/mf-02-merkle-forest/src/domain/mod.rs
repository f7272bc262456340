//! # Domain Module
//!
//! Core domain types for the Merkle forest: blocks, shards, errors,
//! configuration and invariants.

pub mod config;
pub mod entities;
pub mod errors;
pub mod invariants;
pub mod shard;
pub mod value_objects;

pub use config::*;
pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use shard::*;
pub use value_objects::*;
