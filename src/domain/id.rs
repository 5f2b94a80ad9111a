//! Identifier types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Deduplication key of a record: `<PREFIX>-<upstream id>`.
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalId(String);

impl ExternalId {
    /// Prefix for P2P trades and deposits.
    pub const BINANCE_PREFIX: &'static str = "BN";
    /// Prefix for Pay transfers, whose ids may collide with the other kinds.
    pub const PAY_PREFIX: &'static str = "PAY";

    /// Wrap an already-prefixed identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build `<prefix>-<upstream_id>`.
    #[must_use]
    pub fn prefixed(prefix: &str, upstream_id: &str) -> Self {
        Self(format!("{prefix}-{}", upstream_id.trim()))
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ExternalId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ExternalId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for ExternalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
