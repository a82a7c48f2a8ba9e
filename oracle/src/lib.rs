//! Commit-reveal proposal voting.
//!
//! Participants resolve numeric questions in two phases: during the voting
//! window each voter submits only a salted digest of their value, and during
//! the reveal window they disclose the plaintext, which must recompute to
//! the digest. Hidden commitments prevent vote copying; revealed votes are
//! aggregated into a stake-weighted mean once quorum is reached.
//!
//! This crate handles:
//! - Per-mint configuration (windows, quorum, stake and fee rates)
//! - The proposal state machine (voting → revealing → resolved/expired)
//! - Vote commitments, reveals, cancellations and corrections
//! - Weighted-mean resolution with a quorum gate
//! - Stake custody and protocol-fee settlement

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod power;
pub mod proposal;
pub mod resolver;
pub mod vault;
pub mod vote;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigPatch, OracleConfig, BPS_DENOMINATOR};
pub use engine::OracleEngine;
pub use error::OracleError;
pub use power::{StaticPowerOracle, VotingPowerOracle};
pub use proposal::{Outcome, Phase, Proposal};
pub use resolver::{resolve_votes, Resolution};
pub use vault::{MemoryVault, Vault};
pub use vote::{RevealedVote, VoteCommitment};
