//! Errors for parsing Verdict identity strings.

use thiserror::Error;

/// Failure to parse a prefixed identity string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("participant identity must start with '{0}'")]
    InvalidParticipantId(String),

    #[error("token mint must start with '{0}'")]
    InvalidTokenMint(String),
}
