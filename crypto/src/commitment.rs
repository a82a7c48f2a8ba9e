//! The commitment codec: hiding a vote value behind a salted digest.
//!
//! `commit(value, salt)` must be byte-identical at commit and reveal call
//! sites — any version drift breaks every outstanding commitment. The salt
//! defends low-entropy vote values (small integers, booleans) against
//! dictionary attacks on the digest.

use crate::hash::blake2b_256_multi;
use subtle::ConstantTimeEq;
use verdict_types::CommitmentDigest;

/// Domain separator so commitment digests can never collide with other
/// Blake2b uses in the protocol (e.g. proposal ids).
const COMMITMENT_DOMAIN: &[u8] = b"verdict.commitment.v1";

/// Compute the commitment digest for a vote value and secret salt.
///
/// Deterministic and fixed-size regardless of salt length.
pub fn commit(value: i64, salt: &[u8]) -> CommitmentDigest {
    let value_bytes = value.to_le_bytes();
    // Length-prefix the salt so (value, salt) pairs cannot be reshuffled
    // into the same preimage.
    let salt_len = (salt.len() as u64).to_le_bytes();
    CommitmentDigest::new(blake2b_256_multi(&[
        COMMITMENT_DOMAIN,
        &value_bytes,
        &salt_len,
        salt,
    ]))
}

/// Verify a revealed (value, salt) pair against a stored digest.
///
/// Comparison is constant-time: this runs while commitment secrecy still
/// matters for sibling commitments, so no timing side-channel may leak how
/// close a guess came.
pub fn verify(digest: &CommitmentDigest, value: i64, salt: &[u8]) -> bool {
    let expected = commit(value, salt);
    expected.as_bytes().ct_eq(digest.as_bytes()).into()
}

/// Generate a 32-byte random salt for a new commitment.
pub fn random_salt() -> [u8; 32] {
    rand::random()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn roundtrip_verifies() {
        let salt = b"a23sw23";
        let digest = commit(400, salt);
        assert!(verify(&digest, 400, salt));
    }

    #[test]
    fn wrong_salt_fails() {
        let digest = commit(400, b"a23sw23");
        assert!(!verify(&digest, 400, b"a23sw24"));
    }

    #[test]
    fn wrong_value_fails() {
        let digest = commit(400, b"a23sw23");
        assert!(!verify(&digest, 401, b"a23sw23"));
    }

    #[test]
    fn negative_values_commit_distinctly() {
        let salt = b"salt";
        assert_ne!(commit(-4, salt), commit(4, salt));
        assert!(verify(&commit(-4, salt), -4, salt));
    }

    #[test]
    fn digest_independent_of_salt_length() {
        // Fixed 32-byte output whatever the salt length.
        let short = commit(1, b"s");
        let long = commit(1, &[0xaa; 512]);
        assert_eq!(short.as_bytes().len(), 32);
        assert_eq!(long.as_bytes().len(), 32);
        assert_ne!(short, long);
    }

    #[test]
    fn random_salts_differ() {
        assert_ne!(random_salt(), random_salt());
    }

    proptest! {
        // Reveal integrity: commit then verify always succeeds.
        #[test]
        fn prop_roundtrip(value in any::<i64>(), salt in proptest::collection::vec(any::<u8>(), 0..64)) {
            let digest = commit(value, &salt);
            prop_assert!(verify(&digest, value, &salt));
        }

        // Commit secrecy: distinct (value, salt) pairs give distinct digests,
        // so observing digests alone reveals nothing about the values.
        #[test]
        fn prop_distinct_pairs_distinct_digests(
            v1 in any::<i64>(),
            v2 in any::<i64>(),
            salt1 in proptest::collection::vec(any::<u8>(), 1..32),
            salt2 in proptest::collection::vec(any::<u8>(), 1..32),
        ) {
            prop_assume!(v1 != v2 || salt1 != salt2);
            prop_assert_ne!(commit(v1, &salt1), commit(v2, &salt2));
        }
    }
}
