//! Pure aggregation of revealed votes into a resolution.
//!
//! The resolution value is the stake-weighted mean of all revealed vote
//! values:
//!
//! `X = Σ(v_i · w_i) / Σ(w_i)`
//!
//! reported as Q32.32 fixed point. Undefined when no weight was revealed —
//! such a proposal expires rather than resolves.

use serde::{Deserialize, Serialize};
use verdict_types::VoteWeight;

/// The weighted aggregate of all revealed votes for a proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// `Σ(v_i · w_i)` over revealed votes.
    pub weighted_sum: i128,
    /// `Σ(w_i)` over revealed votes.
    pub total_weight: VoteWeight,
    /// Whether the revealed weight reached the required quorum.
    pub quorum_reached: bool,
}

impl Resolution {
    /// The weighted mean as Q32.32 fixed point, or `None` if no weight was
    /// revealed. Saturates at the i64 range for extreme sums.
    pub fn mean_fp(&self) -> Option<i64> {
        let weight = self.total_weight.raw();
        if weight == 0 {
            return None;
        }
        let magnitude = (self.weighted_sum.unsigned_abs() << 32) / weight;
        let magnitude = if magnitude > i64::MAX as u128 {
            i64::MAX
        } else {
            magnitude as i64
        };
        Some(if self.weighted_sum < 0 {
            -magnitude
        } else {
            magnitude
        })
    }

    /// The weighted mean as f64, for display and assertions only — protocol
    /// arithmetic stays in fixed point.
    pub fn mean_f64(&self) -> Option<f64> {
        self.mean_fp().map(|fp| fp as f64 / (1u64 << 32) as f64)
    }
}

/// Build a resolution from running accumulators.
pub fn resolve(
    weighted_sum: i128,
    total_weight: VoteWeight,
    required_votes: VoteWeight,
) -> Resolution {
    Resolution {
        weighted_sum,
        total_weight,
        quorum_reached: total_weight >= required_votes,
    }
}

/// Aggregate a set of revealed (value, weight) pairs from scratch.
///
/// The engine maintains the sums incrementally per reveal; this exists for
/// offline verification and tests, and must agree with the incremental path.
pub fn resolve_votes(votes: &[(i64, VoteWeight)], required_votes: VoteWeight) -> Resolution {
    let mut weighted_sum = 0i128;
    let mut total_weight = VoteWeight::ZERO;
    for (value, weight) in votes {
        weighted_sum += *value as i128 * weight.raw() as i128;
        total_weight = total_weight
            .checked_add(*weight)
            .expect("total weight overflow");
    }
    resolve(weighted_sum, total_weight, required_votes)
}
