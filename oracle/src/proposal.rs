//! Proposals and their time-gated state machine.
//!
//! A proposal's phase is a pure function of its persisted facts and the
//! current time — no scheduler drives transitions. The only event-driven
//! facts are the two terminal outcomes (quorum-crossing resolution and
//! expiry settlement), persisted in `outcome` once reached and permanent
//! from then on.

use crate::config::OracleConfig;
use crate::error::OracleError;
use crate::resolver::{self, Resolution};
use serde::{Deserialize, Serialize};
use std::fmt;
use verdict_types::{ParticipantId, ProposalId, StakeAmount, Timestamp, TokenMint, VoteWeight};

/// Observable phase of a proposal at a point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Commitments (and cancellations) are accepted.
    Voting,
    /// Commit window closed; reveals are accepted.
    Revealing,
    /// Quorum was reached and the resolution computed. Terminal.
    Resolved,
    /// The reveal window elapsed without quorum. Terminal.
    Expired,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Resolved | Phase::Expired)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Voting => "voting",
            Phase::Revealing => "revealing",
            Phase::Resolved => "resolved",
            Phase::Expired => "expired",
        };
        write!(f, "{s}")
    }
}

/// Persisted terminal fact. Monotonic: once set, never unset or replaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Resolved(Resolution),
    Expired,
}

/// A single question under resolution. Owns its vault and its commitment
/// registry (held by the engine, keyed by voter).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Content-derived id: hash of the name.
    pub id: ProposalId,
    /// The mint whose config governs this proposal.
    pub token_mint: TokenMint,
    pub name: String,
    pub description: String,
    pub proposer: ParticipantId,
    /// Stake the proposer locked at creation.
    pub proposer_stake: StakeAmount,
    pub created_at: Timestamp,
    /// End of the commit window.
    pub voting_deadline: Timestamp,
    /// End of the reveal window. Always strictly after `voting_deadline`.
    pub reveal_deadline: Timestamp,
    /// Quorum threshold, snapshotted from the config at creation.
    pub required_votes: VoteWeight,
    /// Stake rate snapshot, basis points.
    pub vote_stake_rate_bps: u32,
    /// Fee rate snapshot, basis points.
    pub protocol_fee_rate_bps: u32,
    /// Total weight committed during the voting window (cancellations
    /// subtract).
    pub committed_weight: VoteWeight,
    /// Running Σ(w_i) over revealed votes. Monotonically non-decreasing
    /// within the reveal phase; the sole serialization point of that phase.
    pub revealed_weight: VoteWeight,
    /// Running Σ(v_i · w_i) over revealed votes.
    pub weighted_sum: i128,
    /// Terminal fact, persisted exactly once.
    pub outcome: Option<Outcome>,
    /// Whether protocol fees have been extracted from the vault.
    pub settled: bool,
    /// Whether the proposer has reclaimed their stake.
    pub proposer_paid: bool,
}

impl Proposal {
    /// Create a proposal against a config, locking the proposer's stake.
    ///
    /// The id is derived from the name, so a name collision is an id
    /// collision — the engine rejects it as `AlreadyExists`.
    pub fn new(
        config: &OracleConfig,
        name: impl Into<String>,
        description: impl Into<String>,
        proposer: ParticipantId,
        stake: StakeAmount,
        now: Timestamp,
    ) -> Result<Self, OracleError> {
        if stake < config.minimum_proposal_stake {
            return Err(OracleError::InsufficientStake {
                have: stake.raw(),
                need: config.minimum_proposal_stake.raw(),
            });
        }
        let name = name.into();
        let voting_deadline = now
            .checked_add_secs(config.voting_period_secs)
            .ok_or(OracleError::Overflow)?;
        let reveal_deadline = voting_deadline
            .checked_add_secs(config.reveal_period_secs)
            .ok_or(OracleError::Overflow)?;
        debug_assert!(voting_deadline < reveal_deadline);
        Ok(Self {
            id: verdict_crypto::proposal_id_for_name(&name),
            token_mint: config.token_mint.clone(),
            name,
            description: description.into(),
            proposer,
            proposer_stake: stake,
            created_at: now,
            voting_deadline,
            reveal_deadline,
            required_votes: config.required_votes,
            vote_stake_rate_bps: config.vote_stake_rate_bps,
            protocol_fee_rate_bps: config.protocol_fee_rate_bps,
            committed_weight: VoteWeight::ZERO,
            revealed_weight: VoteWeight::ZERO,
            weighted_sum: 0,
            outcome: None,
            settled: false,
            proposer_paid: false,
        })
    }

    /// The phase observed at `now`. Pure over persisted facts + time.
    pub fn phase_at(&self, now: Timestamp) -> Phase {
        match self.outcome {
            Some(Outcome::Resolved(_)) => Phase::Resolved,
            Some(Outcome::Expired) => Phase::Expired,
            None => {
                if now < self.voting_deadline {
                    Phase::Voting
                } else if now < self.reveal_deadline {
                    Phase::Revealing
                } else {
                    // Reveal window elapsed without quorum; terminal in
                    // effect, persisted on the next finalize.
                    Phase::Expired
                }
            }
        }
    }

    pub fn quorum_reached(&self) -> bool {
        self.revealed_weight >= self.required_votes
    }

    /// Account a new commitment's weight.
    pub fn record_commit(&mut self, weight: VoteWeight) -> Result<(), OracleError> {
        self.committed_weight = self
            .committed_weight
            .checked_add(weight)
            .ok_or(OracleError::Overflow)?;
        Ok(())
    }

    /// Remove a cancelled commitment's weight.
    pub fn record_cancel(&mut self, weight: VoteWeight) {
        self.committed_weight = self.committed_weight.saturating_sub(weight);
    }

    /// Fold a revealed vote into the running accumulators. Returns true the
    /// first time the revealed weight crosses the quorum threshold.
    pub fn record_reveal(&mut self, value: i64, weight: VoteWeight) -> Result<bool, OracleError> {
        let was_reached = self.quorum_reached();
        self.revealed_weight = self
            .revealed_weight
            .checked_add(weight)
            .ok_or(OracleError::Overflow)?;
        self.weighted_sum += value as i128 * weight.raw() as i128;
        Ok(!was_reached && self.quorum_reached())
    }

    /// Swap a corrected revealed value in the weighted sum. Weight is
    /// unchanged, so quorum cannot regress.
    pub fn apply_correction(&mut self, old_value: i64, new_value: i64, weight: VoteWeight) {
        self.weighted_sum -= old_value as i128 * weight.raw() as i128;
        self.weighted_sum += new_value as i128 * weight.raw() as i128;
    }

    /// The resolution implied by the current accumulators.
    pub fn resolution(&self) -> Resolution {
        resolver::resolve(self.weighted_sum, self.revealed_weight, self.required_votes)
    }
}
