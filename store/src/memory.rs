//! In-memory storage backend.

use crate::oracle::OracleStore;
use crate::StoreError;
use std::collections::HashMap;
use std::sync::Mutex;
use verdict_types::{ParticipantId, ProposalId, TokenMint};

/// HashMap-backed store for tests and single-process deployments.
#[derive(Default)]
pub struct MemoryStore {
    configs: Mutex<HashMap<TokenMint, Vec<u8>>>,
    proposals: Mutex<HashMap<ProposalId, Vec<u8>>>,
    votes: Mutex<HashMap<(ProposalId, ParticipantId), Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OracleStore for MemoryStore {
    fn put_config(&self, mint: &TokenMint, data: &[u8]) -> Result<(), StoreError> {
        self.configs
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .insert(mint.clone(), data.to_vec());
        Ok(())
    }

    fn get_config(&self, mint: &TokenMint) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .configs
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .get(mint)
            .cloned())
    }

    fn iter_configs(&self) -> Result<Vec<(TokenMint, Vec<u8>)>, StoreError> {
        Ok(self
            .configs
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn put_proposal(&self, id: &ProposalId, data: &[u8]) -> Result<(), StoreError> {
        self.proposals
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .insert(*id, data.to_vec());
        Ok(())
    }

    fn get_proposal(&self, id: &ProposalId) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .proposals
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .get(id)
            .cloned())
    }

    fn iter_proposals(&self) -> Result<Vec<(ProposalId, Vec<u8>)>, StoreError> {
        Ok(self
            .proposals
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .iter()
            .map(|(k, v)| (*k, v.clone()))
            .collect())
    }

    fn put_vote(
        &self,
        proposal: &ProposalId,
        voter: &ParticipantId,
        data: &[u8],
    ) -> Result<(), StoreError> {
        self.votes
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .insert((*proposal, voter.clone()), data.to_vec());
        Ok(())
    }

    fn get_vote(
        &self,
        proposal: &ProposalId,
        voter: &ParticipantId,
    ) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .votes
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .get(&(*proposal, voter.clone()))
            .cloned())
    }

    fn delete_vote(
        &self,
        proposal: &ProposalId,
        voter: &ParticipantId,
    ) -> Result<(), StoreError> {
        self.votes
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .remove(&(*proposal, voter.clone()));
        Ok(())
    }

    fn iter_votes(&self) -> Result<Vec<(ProposalId, ParticipantId, Vec<u8>)>, StoreError> {
        Ok(self
            .votes
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .iter()
            .map(|((p, v), data)| (*p, v.clone(), data.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mint() -> TokenMint {
        TokenMint::new("mint_test")
    }

    fn voter() -> ParticipantId {
        ParticipantId::new("vdt_voter")
    }

    #[test]
    fn config_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get_config(&mint()).unwrap().is_none());
        store.put_config(&mint(), b"cfg").unwrap();
        assert_eq!(store.get_config(&mint()).unwrap().unwrap(), b"cfg");
        assert_eq!(store.iter_configs().unwrap().len(), 1);
    }

    #[test]
    fn vote_delete_removes_record() {
        let store = MemoryStore::new();
        let id = ProposalId::new([7u8; 32]);
        store.put_vote(&id, &voter(), b"vote").unwrap();
        assert!(store.get_vote(&id, &voter()).unwrap().is_some());
        store.delete_vote(&id, &voter()).unwrap();
        assert!(store.get_vote(&id, &voter()).unwrap().is_none());
    }

    #[test]
    fn proposal_overwrite_keeps_latest() {
        let store = MemoryStore::new();
        let id = ProposalId::new([1u8; 32]);
        store.put_proposal(&id, b"v1").unwrap();
        store.put_proposal(&id, b"v2").unwrap();
        assert_eq!(store.get_proposal(&id).unwrap().unwrap(), b"v2");
    }
}
