//! # Adapters Layer (Hexagonal Architecture)
//!
//! Deterministic implementations of the outbound collaborator ports.

mod consensus_gate;
mod proof_of_work;

pub use consensus_gate::{ScriptedConsensusGate, StaticConsensusGate};
pub use proof_of_work::ProofOfWorkFactory;
