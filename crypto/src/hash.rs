//! Blake2b hashing for content-derived identifiers.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use verdict_types::ProposalId;

type Blake2b256 = Blake2b<U32>;

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Derive the proposal id from its name.
///
/// Every caller holding the name can reproduce the id, and two proposals
/// with the same name collide by construction — uniqueness is enforced at
/// creation time.
pub fn proposal_id_for_name(name: &str) -> ProposalId {
    ProposalId::new(blake2b_256(name.as_bytes()))
}
