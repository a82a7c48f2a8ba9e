//! Per-voter vote commitments and their lifecycle.
//!
//! A commitment binds a digest to a weight snapshot. It is mutated at most
//! once by its voter — revealed or cancelled — and forfeited implicitly if
//! still unrevealed when its proposal terminates.

use crate::error::OracleError;
use serde::{Deserialize, Serialize};
use verdict_types::{CommitmentDigest, ParticipantId, ProposalId, StakeAmount, Timestamp, VoteWeight};

/// The revealed half of a commitment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedVote {
    /// The plaintext vote value.
    pub value: i64,
    pub revealed_at: Timestamp,
}

/// A voter's commitment on a proposal, keyed by (proposal, voter).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCommitment {
    pub proposal: ProposalId,
    pub voter: ParticipantId,
    /// Digest of (value, salt); the plaintext is invisible until reveal.
    pub digest: CommitmentDigest,
    /// Tally weight, snapshotted from the power oracle at commit time and
    /// never re-queried.
    pub weight: VoteWeight,
    /// Stake actually held in the vault (weight scaled by the stake rate).
    pub locked_stake: StakeAmount,
    pub committed_at: Timestamp,
    /// Present once the voter has revealed.
    pub revealed: Option<RevealedVote>,
    /// Set at resolution time for commitments that never revealed; their
    /// locked stake stays in the vault.
    pub forfeited: bool,
    /// Whether the voter has reclaimed their stake after settlement.
    pub stake_reclaimed: bool,
}

impl VoteCommitment {
    pub fn new(
        proposal: ProposalId,
        voter: ParticipantId,
        digest: CommitmentDigest,
        weight: VoteWeight,
        locked_stake: StakeAmount,
        committed_at: Timestamp,
    ) -> Self {
        Self {
            proposal,
            voter,
            digest,
            weight,
            locked_stake,
            committed_at,
            revealed: None,
            forfeited: false,
            stake_reclaimed: false,
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed.is_some()
    }

    /// Prove the committed value by supplying the plaintext and salt.
    ///
    /// The digest recomputation is the integrity check: a committed value
    /// cannot be changed after the fact without failing it.
    pub fn reveal(&mut self, value: i64, salt: &[u8], now: Timestamp) -> Result<(), OracleError> {
        if self.is_revealed() {
            return Err(OracleError::AlreadyRevealed(self.voter.to_string()));
        }
        if !verdict_crypto::verify(&self.digest, value, salt) {
            return Err(OracleError::InvalidReveal);
        }
        self.revealed = Some(RevealedVote {
            value,
            revealed_at: now,
        });
        Ok(())
    }

    /// Overwrite an already-public revealed value, returning the old one.
    ///
    /// No re-hashing: the value is public by now. The locked stake and
    /// weight are untouched — this is a correction, not a new vote.
    pub fn update_value(&mut self, new_value: i64) -> Result<i64, OracleError> {
        match &mut self.revealed {
            Some(revealed) => {
                let old = revealed.value;
                revealed.value = new_value;
                Ok(old)
            }
            None => Err(OracleError::VoteNotRevealed(self.voter.to_string())),
        }
    }
}
