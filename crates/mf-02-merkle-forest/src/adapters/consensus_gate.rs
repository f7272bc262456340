//! Consensus Gate Adapters
//!
//! Deterministic `ConsensusGate` implementations. Production deployments
//! plug a voting protocol in behind the same port.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::domain::Block;
use crate::ports::outbound::ConsensusGate;

/// Gate that always returns the same decision.
#[derive(Clone, Copy, Debug)]
pub struct StaticConsensusGate {
    accept: bool,
}

impl StaticConsensusGate {
    /// Accept every candidate.
    pub fn accepting() -> Self {
        Self { accept: true }
    }

    /// Reject every candidate.
    pub fn rejecting() -> Self {
        Self { accept: false }
    }
}

#[async_trait]
impl ConsensusGate for StaticConsensusGate {
    async fn decide(&self, _candidate: &Block) -> bool {
        self.accept
    }
}

/// Gate that replays a fixed sequence of decisions, then a fallback.
#[derive(Debug)]
pub struct ScriptedConsensusGate {
    script: Mutex<VecDeque<bool>>,
    fallback: bool,
    decided: Mutex<Vec<bool>>,
}

impl ScriptedConsensusGate {
    /// Replay `decisions` in order; afterwards return `fallback`.
    pub fn new(decisions: impl IntoIterator<Item = bool>, fallback: bool) -> Self {
        Self {
            script: Mutex::new(decisions.into_iter().collect()),
            fallback,
            decided: Mutex::new(Vec::new()),
        }
    }

    /// Every decision returned so far.
    pub fn history(&self) -> Vec<bool> {
        self.decided.lock().clone()
    }
}

#[async_trait]
impl ConsensusGate for ScriptedConsensusGate {
    async fn decide(&self, candidate: &Block) -> bool {
        let decision = self.script.lock().pop_front().unwrap_or(self.fallback);
        self.decided.lock().push(decision);

        debug!(
            "[mf-02] Scripted decision {} for {:02x}{:02x}...",
            decision, candidate.hash[0], candidate.hash[1]
        );
        decision
    }
}
