//! Ranking snapshot types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Date, SecurityId};

/// How the ranks of a snapshot are to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankKind {
    /// Ranks are decile buckets in `1..=10`, 1 = smallest.
    Decile,
    /// Ranks are ordinal positions, 1 = largest.
    Ordinal,
}

/// Ranks of the eligible securities on one ranking date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingSnapshot {
    /// Ranking date.
    pub date: Date,
    /// Interpretation of `ranks`.
    pub kind: RankKind,
    /// Rank per eligible security.
    pub ranks: BTreeMap<SecurityId, u32>,
}

impl RankingSnapshot {
    /// Create a new snapshot.
    #[must_use]
    pub const fn new(date: Date, kind: RankKind, ranks: BTreeMap<SecurityId, u32>) -> Self {
        Self { date, kind, ranks }
    }

    /// Number of securities that were eligible on the ranking date.
    #[must_use]
    pub fn eligible(&self) -> usize {
        self.ranks.len()
    }

    /// Check if no security was eligible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Rank of a security, if it was eligible.
    #[must_use]
    pub fn rank(&self, id: SecurityId) -> Option<u32> {
        self.ranks.get(&id).copied()
    }
}
