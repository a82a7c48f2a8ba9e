//! Participant identity type with `vdt_` prefix.

use crate::error::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A Verdict participant identity, always prefixed with `vdt_`.
///
/// Proposers, voters and the protocol authority are all addressed this way.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// The standard prefix for all Verdict participant identities.
    pub const PREFIX: &'static str = "vdt_";

    /// Create a new participant id from a trusted string (e.g. a literal).
    ///
    /// # Panics
    /// Panics if the string does not start with `vdt_`. Untrusted input
    /// goes through [`ParticipantId::parse`] instead.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(s.starts_with(Self::PREFIX), "identity must start with vdt_");
        Self(s)
    }

    /// Parse a participant id from an untrusted string.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypeError> {
        let s = raw.into();
        if s.starts_with(Self::PREFIX) {
            Ok(Self(s))
        } else {
            Err(TypeError::InvalidParticipantId(Self::PREFIX.to_string()))
        }
    }

    /// Return the raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this identity is well-formed.
    pub fn is_valid(&self) -> bool {
        self.0.starts_with(Self::PREFIX) && self.0.len() > Self::PREFIX.len()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ParticipantId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl FromStr for ParticipantId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
