//! Fundamental types for the Verdict oracle protocol.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: participant identities, token mints, content-derived proposal
//! ids, commitment digests, amounts, weights, and timestamps.

pub mod address;
pub mod amount;
pub mod error;
pub mod hash;
pub mod mint;
pub mod time;

pub use address::ParticipantId;
pub use amount::{StakeAmount, VoteWeight};
pub use error::TypeError;
pub use hash::{CommitmentDigest, ProposalId};
pub use mint::TokenMint;
pub use time::Timestamp;
