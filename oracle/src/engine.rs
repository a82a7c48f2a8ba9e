//! The oracle engine — drives configs, proposals and vote commitments
//! through the commit-reveal lifecycle.
//!
//! The execution model is single-writer-per-entity: the hosting layer
//! serializes mutations per proposal and per commitment, so each operation
//! here runs to completion against a consistent view. Every operation either
//! applies fully or returns an error with no state change.

use crate::clock::Clock;
use crate::config::{ConfigPatch, OracleConfig};
use crate::error::OracleError;
use crate::power::VotingPowerOracle;
use crate::proposal::{Outcome, Phase, Proposal};
use crate::vault::Vault;
use crate::vote::VoteCommitment;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};
use verdict_types::{
    CommitmentDigest, ParticipantId, ProposalId, StakeAmount, TokenMint, VoteWeight,
};

/// The commit-reveal proposal voting engine.
pub struct OracleEngine {
    configs: HashMap<TokenMint, OracleConfig>,
    proposals: HashMap<ProposalId, Proposal>,
    /// At most one commitment per (proposal, voter).
    votes: HashMap<(ProposalId, ParticipantId), VoteCommitment>,
    power: Arc<dyn VotingPowerOracle>,
    vault: Arc<dyn Vault>,
    clock: Arc<dyn Clock>,
}

impl OracleEngine {
    pub fn new(
        power: Arc<dyn VotingPowerOracle>,
        vault: Arc<dyn Vault>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            configs: HashMap::new(),
            proposals: HashMap::new(),
            votes: HashMap::new(),
            power,
            vault,
            clock,
        }
    }

    // ----- config -----

    /// Create the config for a mint with protocol defaults.
    pub fn initialize_config(
        &mut self,
        token_mint: TokenMint,
        protocol_authority: ParticipantId,
    ) -> Result<&OracleConfig, OracleError> {
        if self.configs.contains_key(&token_mint) {
            return Err(OracleError::AlreadyExists(token_mint.to_string()));
        }
        info!(mint = %token_mint, authority = %protocol_authority, "config initialized");
        Ok(self
            .configs
            .entry(token_mint.clone())
            .or_insert_with(|| OracleConfig::new(token_mint, protocol_authority)))
    }

    /// Patch the config that owns the referenced proposal.
    ///
    /// Only fields present in the patch are touched. Gated on the caller
    /// being the config's protocol authority.
    pub fn update_config(
        &mut self,
        proposal: &ProposalId,
        caller: &ParticipantId,
        patch: &ConfigPatch,
    ) -> Result<(), OracleError> {
        let mint = self
            .proposals
            .get(proposal)
            .ok_or_else(|| OracleError::ProposalNotFound(proposal.to_string()))?
            .token_mint
            .clone();
        let config = self
            .configs
            .get_mut(&mint)
            .ok_or_else(|| OracleError::ConfigNotFound(mint.to_string()))?;
        if config.protocol_authority != *caller {
            return Err(OracleError::Unauthorized(caller.to_string()));
        }
        config.apply(patch)?;
        info!(mint = %mint, "config updated");
        Ok(())
    }

    // ----- proposal -----

    /// Create a proposal and lock the proposer's stake into its vault.
    pub fn create_proposal(
        &mut self,
        token_mint: &TokenMint,
        proposer: &ParticipantId,
        name: &str,
        description: &str,
        stake: StakeAmount,
    ) -> Result<ProposalId, OracleError> {
        let config = self
            .configs
            .get(token_mint)
            .ok_or_else(|| OracleError::ConfigNotFound(token_mint.to_string()))?;
        let now = self.clock.now();
        let proposal = Proposal::new(config, name, description, proposer.clone(), stake, now)?;
        let id = proposal.id;
        if self.proposals.contains_key(&id) {
            return Err(OracleError::AlreadyExists(format!("proposal '{name}'")));
        }
        self.vault.deposit(&id, proposer, stake)?;
        info!(
            proposal = %id,
            proposer = %proposer,
            %stake,
            voting_deadline = %proposal.voting_deadline,
            reveal_deadline = %proposal.reveal_deadline,
            "proposal created"
        );
        self.proposals.insert(id, proposal);
        Ok(id)
    }

    // ----- commit phase -----

    /// Submit a hidden vote during the voting window.
    ///
    /// Snapshots the voter's weight from the power oracle and locks
    /// `weight × stake_rate` into the vault. Returns the snapshotted weight.
    pub fn submit_vote(
        &mut self,
        proposal_id: &ProposalId,
        voter: &ParticipantId,
        digest: CommitmentDigest,
    ) -> Result<VoteWeight, OracleError> {
        let now = self.clock.now();
        let proposal = self
            .proposals
            .get_mut(proposal_id)
            .ok_or_else(|| OracleError::ProposalNotFound(proposal_id.to_string()))?;
        match proposal.phase_at(now) {
            Phase::Voting => {}
            Phase::Revealing => {
                return Err(OracleError::VotingClosed {
                    deadline: proposal.voting_deadline,
                    now,
                })
            }
            phase => return Err(OracleError::ProposalClosed(phase.to_string())),
        }
        let key = (*proposal_id, voter.clone());
        if self.votes.contains_key(&key) {
            return Err(OracleError::AlreadyVoted(voter.to_string()));
        }
        let weight = self.power.weight_of(voter, now);
        if weight.is_zero() {
            return Err(OracleError::InsufficientStake { have: 0, need: 1 });
        }
        let locked_stake = weight
            .stake_at_bps(proposal.vote_stake_rate_bps)
            .ok_or(OracleError::Overflow)?;
        // Accumulate before depositing so a failure on either side leaves no
        // partial state: a rejected commit must not strand stake in the
        // vault, and a failed deposit must not leave phantom weight.
        proposal.record_commit(weight)?;
        if let Err(err) = self.vault.deposit(proposal_id, voter, locked_stake) {
            proposal.record_cancel(weight);
            return Err(err);
        }
        debug!(proposal = %proposal_id, voter = %voter, %weight, %locked_stake, "vote committed");
        self.votes.insert(
            key,
            VoteCommitment::new(*proposal_id, voter.clone(), digest, weight, locked_stake, now),
        );
        Ok(weight)
    }

    /// Cancel a commitment before the voting deadline, refunding its stake
    /// and deleting the record.
    pub fn cancel_vote(
        &mut self,
        proposal_id: &ProposalId,
        voter: &ParticipantId,
    ) -> Result<StakeAmount, OracleError> {
        let now = self.clock.now();
        let proposal = self
            .proposals
            .get_mut(proposal_id)
            .ok_or_else(|| OracleError::ProposalNotFound(proposal_id.to_string()))?;
        match proposal.phase_at(now) {
            Phase::Voting => {}
            Phase::Revealing | Phase::Expired if proposal.outcome.is_none() => {
                return Err(OracleError::TooLate {
                    deadline: proposal.voting_deadline,
                    now,
                })
            }
            phase => return Err(OracleError::ProposalClosed(phase.to_string())),
        }
        let key = (*proposal_id, voter.clone());
        let commitment = self
            .votes
            .get(&key)
            .ok_or_else(|| OracleError::VoteNotFound(voter.to_string()))?;
        let refund = commitment.locked_stake;
        let weight = commitment.weight;
        self.vault.withdraw(proposal_id, voter, refund)?;
        proposal.record_cancel(weight);
        self.votes.remove(&key);
        debug!(proposal = %proposal_id, voter = %voter, %refund, "vote cancelled");
        Ok(refund)
    }

    // ----- reveal phase -----

    /// Reveal a committed vote during the reveal window.
    ///
    /// On the reveal that crosses quorum, the proposal resolves eagerly and
    /// unrevealed commitments are forfeited.
    pub fn reveal_vote(
        &mut self,
        proposal_id: &ProposalId,
        voter: &ParticipantId,
        value: i64,
        salt: &[u8],
    ) -> Result<(), OracleError> {
        let now = self.clock.now();
        let proposal = self
            .proposals
            .get_mut(proposal_id)
            .ok_or_else(|| OracleError::ProposalNotFound(proposal_id.to_string()))?;
        match proposal.phase_at(now) {
            Phase::Revealing => {}
            Phase::Voting => {
                return Err(OracleError::NotRevealable(format!(
                    "voting open until {}",
                    proposal.voting_deadline
                )))
            }
            Phase::Expired if proposal.outcome.is_none() => {
                return Err(OracleError::NotRevealable(format!(
                    "reveal window ended at {}",
                    proposal.reveal_deadline
                )))
            }
            phase => return Err(OracleError::ProposalClosed(phase.to_string())),
        }
        let key = (*proposal_id, voter.clone());
        let commitment = self
            .votes
            .get_mut(&key)
            .ok_or_else(|| OracleError::VoteNotFound(voter.to_string()))?;
        commitment.reveal(value, salt, now)?;
        let weight = commitment.weight;
        let crossed_quorum = proposal.record_reveal(value, weight)?;
        debug!(
            proposal = %proposal_id,
            voter = %voter,
            value,
            %weight,
            revealed_weight = %proposal.revealed_weight,
            "vote revealed"
        );
        if crossed_quorum {
            let resolution = proposal.resolution();
            proposal.outcome = Some(Outcome::Resolved(resolution));
            info!(
                proposal = %proposal_id,
                revealed_weight = %resolution.total_weight,
                "quorum reached, proposal resolved"
            );
            Self::forfeit_unrevealed(&mut self.votes, proposal_id);
        }
        Ok(())
    }

    /// Correct an already-revealed value before the proposal terminates.
    pub fn update_vote(
        &mut self,
        proposal_id: &ProposalId,
        voter: &ParticipantId,
        new_value: i64,
    ) -> Result<(), OracleError> {
        let now = self.clock.now();
        let proposal = self
            .proposals
            .get_mut(proposal_id)
            .ok_or_else(|| OracleError::ProposalNotFound(proposal_id.to_string()))?;
        match proposal.phase_at(now) {
            Phase::Revealing => {}
            Phase::Voting => {
                return Err(OracleError::NotRevealable(format!(
                    "voting open until {}",
                    proposal.voting_deadline
                )))
            }
            phase => return Err(OracleError::ProposalClosed(phase.to_string())),
        }
        let key = (*proposal_id, voter.clone());
        let commitment = self
            .votes
            .get_mut(&key)
            .ok_or_else(|| OracleError::VoteNotFound(voter.to_string()))?;
        let weight = commitment.weight;
        let old_value = commitment.update_value(new_value)?;
        proposal.apply_correction(old_value, new_value, weight);
        debug!(proposal = %proposal_id, voter = %voter, old_value, new_value, "vote corrected");
        Ok(())
    }

    // ----- finalization & settlement -----

    /// Persist the terminal outcome of a proposal.
    ///
    /// Resolves if quorum was reached, expires if the reveal window has
    /// elapsed without it; errors while the window is still open.
    /// Unrevealed commitments are forfeited at this point.
    pub fn finalize(&mut self, proposal_id: &ProposalId) -> Result<Phase, OracleError> {
        let now = self.clock.now();
        let proposal = self
            .proposals
            .get_mut(proposal_id)
            .ok_or_else(|| OracleError::ProposalNotFound(proposal_id.to_string()))?;
        if let Some(outcome) = proposal.outcome {
            let phase = match outcome {
                Outcome::Resolved(_) => Phase::Resolved,
                Outcome::Expired => Phase::Expired,
            };
            return Err(OracleError::ProposalClosed(phase.to_string()));
        }
        // A mean over zero revealed weight is undefined, so a proposal
        // nobody revealed into expires even when the quorum threshold is 0.
        let phase = if proposal.quorum_reached() && !proposal.revealed_weight.is_zero() {
            let resolution = proposal.resolution();
            proposal.outcome = Some(Outcome::Resolved(resolution));
            info!(proposal = %proposal_id, "finalized as resolved");
            Phase::Resolved
        } else if now >= proposal.reveal_deadline {
            proposal.outcome = Some(Outcome::Expired);
            info!(
                proposal = %proposal_id,
                revealed_weight = %proposal.revealed_weight,
                required = %proposal.required_votes,
                "finalized as expired, quorum not reached"
            );
            Phase::Expired
        } else {
            return Err(OracleError::RevealWindowOpen {
                reveal_deadline: proposal.reveal_deadline,
                now,
            });
        };
        Self::forfeit_unrevealed(&mut self.votes, proposal_id);
        Ok(phase)
    }

    fn forfeit_unrevealed(
        votes: &mut HashMap<(ProposalId, ParticipantId), VoteCommitment>,
        proposal_id: &ProposalId,
    ) {
        for ((pid, voter), commitment) in votes.iter_mut() {
            if pid == proposal_id && !commitment.is_revealed() && !commitment.forfeited {
                commitment.forfeited = true;
                debug!(proposal = %proposal_id, voter = %voter, stake = %commitment.locked_stake, "commitment forfeited");
            }
        }
    }

    /// Extract the protocol fee from a settled proposal's vault.
    ///
    /// Authority-only, one-shot: a second call fails with `AlreadySettled`
    /// rather than silently paying nothing, so double-collection attempts
    /// are detectable.
    pub fn collect_fees(
        &mut self,
        caller: &ParticipantId,
        proposal_id: &ProposalId,
    ) -> Result<StakeAmount, OracleError> {
        let proposal = self
            .proposals
            .get_mut(proposal_id)
            .ok_or_else(|| OracleError::ProposalNotFound(proposal_id.to_string()))?;
        let config = self
            .configs
            .get(&proposal.token_mint)
            .ok_or_else(|| OracleError::ConfigNotFound(proposal.token_mint.to_string()))?;
        if config.protocol_authority != *caller {
            return Err(OracleError::Unauthorized(caller.to_string()));
        }
        let authority = config.protocol_authority.clone();
        if proposal.outcome.is_none() {
            return Err(OracleError::ProposalActive(proposal_id.to_string()));
        }
        if proposal.settled {
            return Err(OracleError::AlreadySettled(proposal_id.to_string()));
        }
        let fee = self
            .vault
            .balance(proposal_id)
            .apply_bps(proposal.protocol_fee_rate_bps)
            .ok_or(OracleError::Overflow)?;
        self.vault.withdraw(proposal_id, &authority, fee)?;
        proposal.settled = true;
        info!(proposal = %proposal_id, %fee, "protocol fees collected");
        Ok(fee)
    }

    /// Return the proposer's stake, net of the proportional fee cut, after
    /// fee settlement of a resolved proposal.
    ///
    /// On expired proposals the proposer stake is absorbed like forfeited
    /// voter stake.
    pub fn collect_proposer_stake(
        &mut self,
        proposal_id: &ProposalId,
    ) -> Result<StakeAmount, OracleError> {
        let proposal = self
            .proposals
            .get_mut(proposal_id)
            .ok_or_else(|| OracleError::ProposalNotFound(proposal_id.to_string()))?;
        match proposal.outcome {
            None => return Err(OracleError::ProposalActive(proposal_id.to_string())),
            Some(Outcome::Expired) => {
                return Err(OracleError::StakeForfeited(format!(
                    "proposal {proposal_id} expired"
                )))
            }
            Some(Outcome::Resolved(_)) => {}
        }
        if !proposal.settled {
            return Err(OracleError::FeesNotCollected(proposal_id.to_string()));
        }
        if proposal.proposer_paid {
            return Err(OracleError::AlreadySettled(format!(
                "proposer stake for {proposal_id}"
            )));
        }
        let net = proposal
            .proposer_stake
            .apply_bps(crate::config::BPS_DENOMINATOR - proposal.protocol_fee_rate_bps)
            .ok_or(OracleError::Overflow)?;
        let proposer = proposal.proposer.clone();
        self.vault.withdraw(proposal_id, &proposer, net)?;
        proposal.proposer_paid = true;
        info!(proposal = %proposal_id, %net, "proposer stake reclaimed");
        Ok(net)
    }

    /// Return a revealed voter's locked stake, net of the proportional fee
    /// cut, after fee settlement. Forfeited commitments reclaim nothing.
    pub fn collect_voter_stake(
        &mut self,
        proposal_id: &ProposalId,
        voter: &ParticipantId,
    ) -> Result<StakeAmount, OracleError> {
        let proposal = self
            .proposals
            .get(proposal_id)
            .ok_or_else(|| OracleError::ProposalNotFound(proposal_id.to_string()))?;
        if proposal.outcome.is_none() {
            return Err(OracleError::ProposalActive(proposal_id.to_string()));
        }
        if !proposal.settled {
            return Err(OracleError::FeesNotCollected(proposal_id.to_string()));
        }
        let fee_rate_bps = proposal.protocol_fee_rate_bps;
        let key = (*proposal_id, voter.clone());
        let commitment = self
            .votes
            .get_mut(&key)
            .ok_or_else(|| OracleError::VoteNotFound(voter.to_string()))?;
        if !commitment.is_revealed() {
            return Err(OracleError::StakeForfeited(voter.to_string()));
        }
        if commitment.stake_reclaimed {
            return Err(OracleError::AlreadySettled(format!(
                "voter stake for {voter}"
            )));
        }
        let net = commitment
            .locked_stake
            .apply_bps(crate::config::BPS_DENOMINATOR - fee_rate_bps)
            .ok_or(OracleError::Overflow)?;
        self.vault.withdraw(proposal_id, voter, net)?;
        commitment.stake_reclaimed = true;
        debug!(proposal = %proposal_id, voter = %voter, %net, "voter stake reclaimed");
        Ok(net)
    }

    // ----- accessors -----

    pub fn config(&self, mint: &TokenMint) -> Option<&OracleConfig> {
        self.configs.get(mint)
    }

    pub fn proposal(&self, id: &ProposalId) -> Option<&Proposal> {
        self.proposals.get(id)
    }

    pub fn vote(&self, proposal: &ProposalId, voter: &ParticipantId) -> Option<&VoteCommitment> {
        self.votes.get(&(*proposal, voter.clone()))
    }

    /// The phase a caller would observe right now.
    pub fn phase_of(&self, proposal_id: &ProposalId) -> Result<Phase, OracleError> {
        let proposal = self
            .proposals
            .get(proposal_id)
            .ok_or_else(|| OracleError::ProposalNotFound(proposal_id.to_string()))?;
        Ok(proposal.phase_at(self.clock.now()))
    }
}

impl OracleEngine {
    /// Persist all engine state to an oracle store.
    pub fn save_to_store(&self, store: &dyn verdict_store::OracleStore) -> Result<(), OracleError> {
        for (mint, config) in &self.configs {
            let bytes =
                bincode::serialize(config).map_err(|e| OracleError::Store(e.to_string()))?;
            store
                .put_config(mint, &bytes)
                .map_err(|e| OracleError::Store(e.to_string()))?;
        }
        for (id, proposal) in &self.proposals {
            let bytes =
                bincode::serialize(proposal).map_err(|e| OracleError::Store(e.to_string()))?;
            store
                .put_proposal(id, &bytes)
                .map_err(|e| OracleError::Store(e.to_string()))?;
        }
        for ((id, voter), commitment) in &self.votes {
            let bytes =
                bincode::serialize(commitment).map_err(|e| OracleError::Store(e.to_string()))?;
            store
                .put_vote(id, voter, &bytes)
                .map_err(|e| OracleError::Store(e.to_string()))?;
        }
        // Cancellation deletes the in-memory record; prune the matching
        // stale rows so a reused store cannot resurrect a refunded vote on
        // the next load.
        for (id, voter, _) in store
            .iter_votes()
            .map_err(|e| OracleError::Store(e.to_string()))?
        {
            if !self.votes.contains_key(&(id, voter.clone())) {
                store
                    .delete_vote(&id, &voter)
                    .map_err(|e| OracleError::Store(e.to_string()))?;
            }
        }
        Ok(())
    }

    /// Restore engine state from an oracle store.
    pub fn load_from_store(
        store: &dyn verdict_store::OracleStore,
        power: Arc<dyn VotingPowerOracle>,
        vault: Arc<dyn Vault>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, OracleError> {
        let mut engine = Self::new(power, vault, clock);
        for (mint, bytes) in store
            .iter_configs()
            .map_err(|e| OracleError::Store(e.to_string()))?
        {
            let config: OracleConfig =
                bincode::deserialize(&bytes).map_err(|e| OracleError::Store(e.to_string()))?;
            engine.configs.insert(mint, config);
        }
        for (id, bytes) in store
            .iter_proposals()
            .map_err(|e| OracleError::Store(e.to_string()))?
        {
            let proposal: Proposal =
                bincode::deserialize(&bytes).map_err(|e| OracleError::Store(e.to_string()))?;
            engine.proposals.insert(id, proposal);
        }
        for (id, voter, bytes) in store
            .iter_votes()
            .map_err(|e| OracleError::Store(e.to_string()))?
        {
            let commitment: VoteCommitment =
                bincode::deserialize(&bytes).map_err(|e| OracleError::Store(e.to_string()))?;
            engine.votes.insert((id, voter), commitment);
        }
        Ok(engine)
    }
}
