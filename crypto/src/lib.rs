//! Cryptographic primitives for the Verdict oracle protocol.
//!
//! Blake2b-256 hashing for content-derived identifiers, and the commitment
//! codec binding hidden vote values to fixed-size digests.

pub mod commitment;
pub mod hash;

pub use commitment::{commit, random_salt, verify};
pub use hash::{blake2b_256, blake2b_256_multi, proposal_id_for_name};
