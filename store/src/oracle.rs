//! Oracle storage trait.

use crate::StoreError;
use verdict_types::{ParticipantId, ProposalId, TokenMint};

/// Store trait for persisting oracle engine state to durable storage.
///
/// Uses opaque `Vec<u8>` so the store doesn't depend on the `verdict-oracle`
/// crate (which would create a circular dependency). The engine
/// serializes/deserializes its own types.
pub trait OracleStore {
    /// Store a config keyed by its token mint.
    fn put_config(&self, mint: &TokenMint, data: &[u8]) -> Result<(), StoreError>;

    /// Get a config by token mint.
    fn get_config(&self, mint: &TokenMint) -> Result<Option<Vec<u8>>, StoreError>;

    /// All stored configs.
    fn iter_configs(&self) -> Result<Vec<(TokenMint, Vec<u8>)>, StoreError>;

    /// Store a proposal keyed by its content-derived id.
    fn put_proposal(&self, id: &ProposalId, data: &[u8]) -> Result<(), StoreError>;

    /// Get a proposal by id.
    fn get_proposal(&self, id: &ProposalId) -> Result<Option<Vec<u8>>, StoreError>;

    /// All stored proposals.
    fn iter_proposals(&self) -> Result<Vec<(ProposalId, Vec<u8>)>, StoreError>;

    /// Store a vote commitment keyed by (proposal, voter).
    fn put_vote(
        &self,
        proposal: &ProposalId,
        voter: &ParticipantId,
        data: &[u8],
    ) -> Result<(), StoreError>;

    /// Get a specific voter's commitment on a proposal.
    fn get_vote(
        &self,
        proposal: &ProposalId,
        voter: &ParticipantId,
    ) -> Result<Option<Vec<u8>>, StoreError>;

    /// Delete a commitment (vote cancellation removes the record entirely).
    fn delete_vote(&self, proposal: &ProposalId, voter: &ParticipantId)
        -> Result<(), StoreError>;

    /// All commitments across all proposals.
    fn iter_votes(&self) -> Result<Vec<(ProposalId, ParticipantId, Vec<u8>)>, StoreError>;
}
