//! Security identifier types.

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Stable integer identifier of a security (e.g. a CRSP `PERMNO`).
///
/// Identifiers are ordered so that the security axis of a panel has a
/// deterministic layout; tie-breaking in rankings follows this order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    From,
    Into,
    Serialize,
    Deserialize,
)]
pub struct SecurityId(pub u64);

impl SecurityId {
    /// Create a new security ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Exchange ticker of a security on a given date.
///
/// Tickers are not stable over time; they are carried for display only and
/// never used as a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub struct Ticker(pub String);

impl Ticker {
    /// Create a new ticker.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the ticker as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Ticker {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Ticker {
    fn from(s: String) -> Self {
        Self(s)
    }
}
