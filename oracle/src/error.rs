use thiserror::Error;
use verdict_types::Timestamp;

/// Errors surfaced by the oracle engine.
///
/// Every failure is terminal for the offending operation and leaves all
/// entity state unchanged. Variants carry enough context (identifier,
/// expected vs. actual phase/time) for callers to decide whether a retry is
/// semantically valid: `InvalidReveal` must never be retried with the same
/// (value, salt) pair, while `InsufficientStake` may be retried after
/// funding more weight.
#[derive(Debug, Error, PartialEq)]
pub enum OracleError {
    #[error("entity already exists: {0}")]
    AlreadyExists(String),

    #[error("caller {0} is not the protocol authority")]
    Unauthorized(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("insufficient stake: have {have}, need {need}")]
    InsufficientStake { have: u128, need: u128 },

    #[error("voting closed at {deadline}, now {now}")]
    VotingClosed { deadline: Timestamp, now: Timestamp },

    #[error("voter {0} already has a commitment on this proposal")]
    AlreadyVoted(String),

    #[error("too late to cancel: voting deadline {deadline}, now {now}")]
    TooLate { deadline: Timestamp, now: Timestamp },

    #[error("proposal is not in its reveal window ({0})")]
    NotRevealable(String),

    #[error("vote by {0} is already revealed")]
    AlreadyRevealed(String),

    #[error("reveal does not match the commitment digest")]
    InvalidReveal,

    #[error("proposal is closed ({0})")]
    ProposalClosed(String),

    #[error("already settled: {0}")]
    AlreadySettled(String),

    #[error("reveal window still open until {reveal_deadline}, now {now}")]
    RevealWindowOpen {
        reveal_deadline: Timestamp,
        now: Timestamp,
    },

    #[error("proposal {0} has not reached a terminal phase")]
    ProposalActive(String),

    #[error("protocol fees not yet collected for proposal {0}")]
    FeesNotCollected(String),

    #[error("stake was forfeited: {0}")]
    StakeForfeited(String),

    #[error("vote by {0} has not been revealed")]
    VoteNotRevealed(String),

    #[error("config not found for mint {0}")]
    ConfigNotFound(String),

    #[error("proposal {0} not found")]
    ProposalNotFound(String),

    #[error("no commitment by {0} on this proposal")]
    VoteNotFound(String),

    #[error("vault error: {0}")]
    Vault(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("arithmetic overflow")]
    Overflow,
}
