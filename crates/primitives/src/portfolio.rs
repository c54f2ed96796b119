//! Portfolio definition types.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ParseError;

/// How often portfolio membership is re-ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cadence {
    /// Re-rank at every period of the panel.
    EveryPeriod,
    /// Re-rank at every period; reported at monthly granularity.
    ///
    /// Shares the every-period code path. The distinct label exists for
    /// downstream reporting, not for a different rebalancing rule.
    Monthly,
    /// Rank on the last December observation and hold for the following
    /// calendar year.
    Yearly,
}

impl Cadence {
    /// All cadences, in reporting order.
    pub const ALL: [Self; 3] = [Self::EveryPeriod, Self::Monthly, Self::Yearly];

    /// Short label used in series names.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::EveryPeriod => "period",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Whether the ranking snapshot is rebuilt at every period.
    #[must_use]
    pub const fn reranks_every_period(self) -> bool {
        matches!(self, Self::EveryPeriod | Self::Monthly)
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Cadence {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "every-period" | "period" | "daily" => Ok(Self::EveryPeriod),
            "monthly" | "month" => Ok(Self::Monthly),
            "yearly" | "annual" | "year" => Ok(Self::Yearly),
            _ => Err(ParseError::UnknownCadence(s.to_string())),
        }
    }
}

/// How member returns are combined into a portfolio return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Weighting {
    /// Arithmetic mean of member returns.
    Equal,
    /// Mean weighted by prior-period market capitalization.
    Value,
}

impl Weighting {
    /// Both weightings, in reporting order.
    pub const ALL: [Self; 2] = [Self::Equal, Self::Value];

    /// Short label used in series names.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Equal => "ew",
            Self::Value => "vw",
        }
    }
}

impl fmt::Display for Weighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Weighting {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equal" | "ew" | "equal-weight" => Ok(Self::Equal),
            "value" | "vw" | "value-weight" => Ok(Self::Value),
            _ => Err(ParseError::UnknownWeighting(s.to_string())),
        }
    }
}

/// How the ranked universe is partitioned into portfolios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scheme {
    /// Ten equal-count buckets by ascending market cap.
    Decile,
    /// The N largest securities by market cap.
    TopN,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decile => f.write_str("decile"),
            Self::TopN => f.write_str("top-n"),
        }
    }
}

impl FromStr for Scheme {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "decile" | "deciles" => Ok(Self::Decile),
            "top-n" | "topn" | "top" => Ok(Self::TopN),
            _ => Err(ParseError::UnknownScheme(s.to_string())),
        }
    }
}

/// Number of decile buckets.
pub const N_DECILES: u8 = 10;

/// A single portfolio within a scheme: a decile bucket or a top-N size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Bucket {
    /// Decile bucket in `1..=10`, 1 holding the smallest securities.
    Decile(u8),
    /// The `n` largest securities.
    Top(usize),
}

impl Bucket {
    /// The scheme this bucket belongs to.
    #[must_use]
    pub const fn scheme(self) -> Scheme {
        match self {
            Self::Decile(_) => Scheme::Decile,
            Self::Top(_) => Scheme::TopN,
        }
    }

    /// All ten decile buckets.
    pub fn deciles() -> impl Iterator<Item = Self> {
        (1..=N_DECILES).map(Self::Decile)
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decile(d) => write!(f, "d{d}"),
            Self::Top(n) => write!(f, "top{n}"),
        }
    }
}

/// Identity of one portfolio return series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PortfolioId {
    /// Rebalancing cadence.
    pub cadence: Cadence,
    /// Weighting convention.
    pub weighting: Weighting,
    /// Decile bucket or top-N size.
    pub bucket: Bucket,
}

impl PortfolioId {
    /// Create a new portfolio identifier.
    #[must_use]
    pub const fn new(cadence: Cadence, weighting: Weighting, bucket: Bucket) -> Self {
        Self { cadence, weighting, bucket }
    }

    /// The scheme of the portfolio.
    #[must_use]
    pub const fn scheme(&self) -> Scheme {
        self.bucket.scheme()
    }

    /// Column name of the series, e.g. `monthly_vw_top500`.
    #[must_use]
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PortfolioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.cadence, self.weighting, self.bucket)
    }
}
