//! Abstract storage traits for the Verdict oracle protocol.
//!
//! Entities are addressed by deterministic identifiers derived from their
//! natural keys (mint for configs, content hash for proposals, the
//! (proposal, voter) pair for commitments). Every storage backend implements
//! these traits; the engine depends only on them. An in-memory backend is
//! provided for tests and single-process deployments.

pub mod error;
pub mod memory;
pub mod oracle;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use oracle::OracleStore;
