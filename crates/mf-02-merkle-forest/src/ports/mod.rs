//! # Ports Module
//!
//! Inbound API trait and outbound collaborator traits.

pub mod inbound;
pub mod outbound;

pub use inbound::MerkleForestApi;
pub use outbound::{BlockFactory, ConsensusGate};
