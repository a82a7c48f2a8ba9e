//! Token mint identity — the natural key of an oracle configuration.

use crate::error::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity of the token a market is denominated in.
///
/// Exactly one oracle `Config` exists per mint; proposals reference their
/// config through it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenMint(String);

impl TokenMint {
    pub const PREFIX: &'static str = "mint_";

    /// Create a new mint identity from a trusted string (e.g. a literal).
    ///
    /// # Panics
    /// Panics if the string does not start with `mint_`. Untrusted input
    /// goes through [`TokenMint::parse`] instead.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(s.starts_with(Self::PREFIX), "mint must start with mint_");
        Self(s)
    }

    /// Parse a mint identity from an untrusted string.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypeError> {
        let s = raw.into();
        if s.starts_with(Self::PREFIX) {
            Ok(Self(s))
        } else {
            Err(TypeError::InvalidTokenMint(Self::PREFIX.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TokenMint {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl FromStr for TokenMint {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TokenMint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
