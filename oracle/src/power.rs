//! Voting-power oracle seam.
//!
//! Voting weight comes from an external locking/escrow mechanism; this core
//! only reads it. Consulted at commit time only — the snapshot taken then is
//! never re-queried, so weight changes between commit and reveal cannot move
//! a vote's tally.

use std::collections::HashMap;
use std::sync::Mutex;
use verdict_types::{ParticipantId, Timestamp, VoteWeight};

/// Read-only view of a participant's locked-stake voting weight.
pub trait VotingPowerOracle: Send + Sync {
    /// The participant's voting weight at the given point in time.
    fn weight_of(&self, participant: &ParticipantId, at: Timestamp) -> VoteWeight;
}

/// Table-driven power oracle for tests and local deployments.
pub struct StaticPowerOracle {
    weights: Mutex<HashMap<ParticipantId, VoteWeight>>,
}

impl StaticPowerOracle {
    pub fn new() -> Self {
        Self {
            weights: Mutex::new(HashMap::new()),
        }
    }

    /// Set a participant's live voting weight.
    pub fn set_weight(&self, participant: ParticipantId, weight: VoteWeight) {
        self.weights
            .lock()
            .expect("power oracle lock poisoned")
            .insert(participant, weight);
    }
}

impl Default for StaticPowerOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl VotingPowerOracle for StaticPowerOracle {
    fn weight_of(&self, participant: &ParticipantId, _at: Timestamp) -> VoteWeight {
        self.weights
            .lock()
            .expect("power oracle lock poisoned")
            .get(participant)
            .copied()
            .unwrap_or(VoteWeight::ZERO)
    }
}
