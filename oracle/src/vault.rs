//! Vault seam: token custody scoped one-to-one with a proposal.
//!
//! The engine never adjusts balances directly — every stake movement goes
//! through this interface, so the accounting invariant (vault balance equals
//! deposits minus withdrawals, never negative) is enforced in one place.

use crate::error::OracleError;
use std::collections::HashMap;
use std::sync::Mutex;
use verdict_types::{ParticipantId, ProposalId, StakeAmount};

/// Token-holding account per proposal.
pub trait Vault: Send + Sync {
    /// Move `amount` from the participant into the proposal's vault.
    fn deposit(
        &self,
        proposal: &ProposalId,
        from: &ParticipantId,
        amount: StakeAmount,
    ) -> Result<(), OracleError>;

    /// Move `amount` out of the proposal's vault to the destination.
    fn withdraw(
        &self,
        proposal: &ProposalId,
        to: &ParticipantId,
        amount: StakeAmount,
    ) -> Result<(), OracleError>;

    /// Current vault balance for a proposal.
    fn balance(&self, proposal: &ProposalId) -> StakeAmount;
}

/// In-memory vault for tests and single-process deployments.
///
/// Tracks per-proposal balances and credits withdrawals to per-participant
/// accounts so refunds and fee payouts can be asserted on.
pub struct MemoryVault {
    balances: Mutex<HashMap<ProposalId, StakeAmount>>,
    credited: Mutex<HashMap<ParticipantId, StakeAmount>>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self {
            balances: Mutex::new(HashMap::new()),
            credited: Mutex::new(HashMap::new()),
        }
    }

    /// Total amount withdrawn to a participant so far.
    pub fn credited(&self, participant: &ParticipantId) -> StakeAmount {
        self.credited
            .lock()
            .expect("vault lock poisoned")
            .get(participant)
            .copied()
            .unwrap_or(StakeAmount::ZERO)
    }
}

impl Default for MemoryVault {
    fn default() -> Self {
        Self::new()
    }
}

impl Vault for MemoryVault {
    fn deposit(
        &self,
        proposal: &ProposalId,
        _from: &ParticipantId,
        amount: StakeAmount,
    ) -> Result<(), OracleError> {
        let mut balances = self.balances.lock().expect("vault lock poisoned");
        let balance = balances.entry(*proposal).or_insert(StakeAmount::ZERO);
        *balance = balance
            .checked_add(amount)
            .ok_or(OracleError::Overflow)?;
        Ok(())
    }

    fn withdraw(
        &self,
        proposal: &ProposalId,
        to: &ParticipantId,
        amount: StakeAmount,
    ) -> Result<(), OracleError> {
        let mut balances = self.balances.lock().expect("vault lock poisoned");
        let balance = balances.entry(*proposal).or_insert(StakeAmount::ZERO);
        *balance = balance.checked_sub(amount).ok_or_else(|| {
            OracleError::Vault(format!(
                "overdraw on proposal {}: balance {}, requested {}",
                proposal, balance, amount
            ))
        })?;
        let mut credited = self.credited.lock().expect("vault lock poisoned");
        let account = credited.entry(to.clone()).or_insert(StakeAmount::ZERO);
        *account = account
            .checked_add(amount)
            .ok_or(OracleError::Overflow)?;
        Ok(())
    }

    fn balance(&self, proposal: &ProposalId) -> StakeAmount {
        self.balances
            .lock()
            .expect("vault lock poisoned")
            .get(proposal)
            .copied()
            .unwrap_or(StakeAmount::ZERO)
    }
}
