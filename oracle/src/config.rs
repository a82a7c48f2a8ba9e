//! Per-mint oracle configuration.
//!
//! Exactly one config exists per token mint. Only the protocol authority may
//! change it, and updates are expressed as an optional-field patch so a
//! partial update never clobbers unrelated parameters.

use crate::error::OracleError;
use serde::{Deserialize, Serialize};
use verdict_types::{ParticipantId, StakeAmount, TokenMint, VoteWeight};

/// Basis points in 100%.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Default voting and reveal windows: one day each.
pub const DEFAULT_PERIOD_SECS: u64 = 86_400;
/// Default aggregate revealed weight needed to reach quorum.
pub const DEFAULT_REQUIRED_VOTES: u128 = 100_000;
/// Default minimum stake a proposer must lock.
pub const DEFAULT_MINIMUM_PROPOSAL_STAKE: u128 = 3_000_000;
/// Default fraction of a voter's weight locked to cast a vote: 1%.
pub const DEFAULT_VOTE_STAKE_RATE_BPS: u32 = 100;
/// Default protocol fee on the vault at settlement: 2%.
pub const DEFAULT_PROTOCOL_FEE_RATE_BPS: u32 = 200;

/// Parameter set governing timing, quorum, stake requirements and the fee
/// rate for every proposal created against this mint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleConfig {
    /// The token this market is denominated in (the config's natural key).
    pub token_mint: TokenMint,
    /// Authorized to update the config and receive protocol fees.
    pub protocol_authority: ParticipantId,
    /// Length of the commit window, in seconds.
    pub voting_period_secs: u64,
    /// Length of the reveal window, in seconds.
    pub reveal_period_secs: u64,
    /// Minimum aggregate revealed weight to reach quorum.
    pub required_votes: VoteWeight,
    /// Minimum stake a proposer must lock into the vault.
    pub minimum_proposal_stake: StakeAmount,
    /// Fraction of a voter's weight locked to vote, in basis points.
    pub vote_stake_rate_bps: u32,
    /// Fraction of the vault taken as protocol fee, in basis points.
    /// Strictly below 10_000.
    pub protocol_fee_rate_bps: u32,
}

impl OracleConfig {
    /// Create a config with protocol defaults.
    pub fn new(token_mint: TokenMint, protocol_authority: ParticipantId) -> Self {
        Self {
            token_mint,
            protocol_authority,
            voting_period_secs: DEFAULT_PERIOD_SECS,
            reveal_period_secs: DEFAULT_PERIOD_SECS,
            required_votes: VoteWeight::new(DEFAULT_REQUIRED_VOTES),
            minimum_proposal_stake: StakeAmount::new(DEFAULT_MINIMUM_PROPOSAL_STAKE),
            vote_stake_rate_bps: DEFAULT_VOTE_STAKE_RATE_BPS,
            protocol_fee_rate_bps: DEFAULT_PROTOCOL_FEE_RATE_BPS,
        }
    }

    /// Apply a partial update. Only supplied fields change; each is validated
    /// before anything is written, so a rejected patch leaves the config
    /// untouched.
    pub fn apply(&mut self, patch: &ConfigPatch) -> Result<(), OracleError> {
        patch.validate()?;
        if let Some(secs) = patch.voting_period_secs {
            self.voting_period_secs = secs;
        }
        if let Some(secs) = patch.reveal_period_secs {
            self.reveal_period_secs = secs;
        }
        if let Some(required) = patch.required_votes {
            self.required_votes = required;
        }
        if let Some(minimum) = patch.minimum_proposal_stake {
            self.minimum_proposal_stake = minimum;
        }
        if let Some(bps) = patch.vote_stake_rate_bps {
            self.vote_stake_rate_bps = bps;
        }
        if let Some(bps) = patch.protocol_fee_rate_bps {
            self.protocol_fee_rate_bps = bps;
        }
        Ok(())
    }
}

/// Optional-field patch for [`OracleConfig::apply`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConfigPatch {
    pub voting_period_secs: Option<u64>,
    pub reveal_period_secs: Option<u64>,
    pub required_votes: Option<VoteWeight>,
    pub minimum_proposal_stake: Option<StakeAmount>,
    pub vote_stake_rate_bps: Option<u32>,
    pub protocol_fee_rate_bps: Option<u32>,
}

impl ConfigPatch {
    fn validate(&self) -> Result<(), OracleError> {
        if self.voting_period_secs == Some(0) {
            return Err(OracleError::InvalidParameter(
                "voting period must be positive".into(),
            ));
        }
        if self.reveal_period_secs == Some(0) {
            return Err(OracleError::InvalidParameter(
                "reveal period must be positive".into(),
            ));
        }
        if let Some(bps) = self.vote_stake_rate_bps {
            if bps > BPS_DENOMINATOR {
                return Err(OracleError::InvalidParameter(format!(
                    "vote stake rate {bps} bps exceeds 10000"
                )));
            }
        }
        if let Some(bps) = self.protocol_fee_rate_bps {
            // Fee rate is a fraction in [0, 1): a 100% fee would confiscate
            // every honest stake.
            if bps >= BPS_DENOMINATOR {
                return Err(OracleError::InvalidParameter(format!(
                    "protocol fee rate {bps} bps must be below 10000"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OracleConfig {
        OracleConfig::new(
            TokenMint::new("mint_usdv"),
            ParticipantId::new("vdt_authority"),
        )
    }

    #[test]
    fn defaults_are_sane() {
        let cfg = config();
        assert_eq!(cfg.voting_period_secs, 86_400);
        assert_eq!(cfg.reveal_period_secs, 86_400);
        assert!(cfg.protocol_fee_rate_bps < BPS_DENOMINATOR);
    }

    #[test]
    fn patch_touches_only_supplied_fields() {
        let mut cfg = config();
        let before = cfg.clone();
        cfg.apply(&ConfigPatch {
            voting_period_secs: Some(100),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(cfg.voting_period_secs, 100);
        assert_eq!(cfg.reveal_period_secs, before.reveal_period_secs);
        assert_eq!(cfg.required_votes, before.required_votes);
        assert_eq!(cfg.protocol_fee_rate_bps, before.protocol_fee_rate_bps);
    }

    #[test]
    fn rejected_patch_changes_nothing() {
        let mut cfg = config();
        let before = cfg.clone();
        let err = cfg
            .apply(&ConfigPatch {
                voting_period_secs: Some(100),
                protocol_fee_rate_bps: Some(10_000),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, OracleError::InvalidParameter(_)));
        assert_eq!(cfg, before);
    }

    #[test]
    fn zero_periods_are_invalid() {
        let mut cfg = config();
        assert!(cfg
            .apply(&ConfigPatch {
                reveal_period_secs: Some(0),
                ..Default::default()
            })
            .is_err());
    }

    #[test]
    fn full_stake_rate_is_allowed() {
        let mut cfg = config();
        cfg.apply(&ConfigPatch {
            vote_stake_rate_bps: Some(10_000),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(cfg.vote_stake_rate_bps, 10_000);
    }
}
