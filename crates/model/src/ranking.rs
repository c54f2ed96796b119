//! Ranking engine: cross-sectional ranks by market cap and the schedule
//! that maps each period to its ranking date.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use capsort_math::{deciles, stable_order};
use capsort_panel::Panel;
use capsort_primitives::{Cadence, Date, RankKind, RankingSnapshot, SecurityId};
use capsort_traits::{RankError, Ranker};
use chrono::Datelike;
use tracing::{debug, warn};

fn validate(metrics: &[(SecurityId, f64)]) -> Result<Vec<f64>, RankError> {
    let mut seen = HashSet::with_capacity(metrics.len());
    metrics
        .iter()
        .map(|&(id, value)| {
            if !value.is_finite() {
                return Err(RankError::NonFinite(id));
            }
            if !seen.insert(id) {
                return Err(RankError::DuplicateSecurity(id));
            }
            Ok(value)
        })
        .collect()
}

/// Count-based decile cut: 1 = smallest tenth, 10 = largest.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecileRanker;

impl Ranker for DecileRanker {
    fn kind(&self) -> RankKind {
        RankKind::Decile
    }

    fn snapshot(
        &self,
        date: Date,
        metrics: &[(SecurityId, f64)],
    ) -> Result<RankingSnapshot, RankError> {
        let values = validate(metrics)?;
        let ranks = metrics
            .iter()
            .zip(deciles(&values))
            .map(|(&(id, _), bucket)| (id, u32::from(bucket)))
            .collect();
        Ok(RankingSnapshot::new(date, RankKind::Decile, ranks))
    }
}

/// Ordinal rank by descending market cap: 1 = largest.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrdinalRanker;

impl Ranker for OrdinalRanker {
    fn kind(&self) -> RankKind {
        RankKind::Ordinal
    }

    fn snapshot(
        &self,
        date: Date,
        metrics: &[(SecurityId, f64)],
    ) -> Result<RankingSnapshot, RankError> {
        let values = validate(metrics)?;
        let ranks = stable_order(&values, true)
            .into_iter()
            .zip(1u32..)
            .map(|(idx, rank)| (metrics[idx].0, rank))
            .collect();
        Ok(RankingSnapshot::new(date, RankKind::Ordinal, ranks))
    }
}

/// The ranker producing snapshots of the given kind.
#[must_use]
pub fn ranker_for(kind: RankKind) -> &'static dyn Ranker {
    match kind {
        RankKind::Decile => &DecileRanker,
        RankKind::Ordinal => &OrdinalRanker,
    }
}

/// Mapping from each period of a date axis to the date its membership is
/// ranked on.
///
/// Every-period and monthly cadences rank on the preceding date. The yearly
/// cadence ranks on the last December date of the preceding calendar year and
/// holds that ranking for the whole year; a year with no such date has no
/// ranking at all.
///
/// Ranking dates are every date for the rolling cadences and the last
/// December date of each year for the yearly cadence, whether or not a later
/// period consumes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingSchedule {
    cadence: Cadence,
    assignments: Vec<Option<usize>>,
    ranking_dates: BTreeSet<usize>,
}

impl RankingSchedule {
    /// Build the schedule for a sorted date axis.
    #[must_use]
    pub fn new(dates: &[Date], cadence: Cadence) -> Self {
        if cadence.reranks_every_period() {
            return Self {
                cadence,
                assignments: (0..dates.len()).map(|t| t.checked_sub(1)).collect(),
                ranking_dates: (0..dates.len()).collect(),
            };
        }
        let last_december = last_december_by_year(dates);
        Self {
            cadence,
            assignments: yearly_assignments(dates, &last_december),
            ranking_dates: last_december.into_values().collect(),
        }
    }

    /// The cadence the schedule was built for.
    #[must_use]
    pub const fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Number of periods covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Check if the schedule covers no period.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Position of the ranking date applied to period `t`.
    #[must_use]
    pub fn ranking_index(&self, t: usize) -> Option<usize> {
        self.assignments.get(t).copied().flatten()
    }

    /// Positions of the ranking dates, ascending.
    #[must_use]
    pub const fn ranking_indices(&self) -> &BTreeSet<usize> {
        &self.ranking_dates
    }
}

fn last_december_by_year(dates: &[Date]) -> BTreeMap<i32, usize> {
    let mut last_december = BTreeMap::new();
    for (t, date) in dates.iter().enumerate() {
        if date.month() == 12 {
            last_december.insert(date.year(), t);
        }
    }
    last_december
}

fn yearly_assignments(dates: &[Date], last_december: &BTreeMap<i32, usize>) -> Vec<Option<usize>> {
    let mut reported = BTreeSet::new();
    dates
        .iter()
        .map(|date| {
            let year = date.year();
            let assigned = last_december.get(&(year - 1)).copied();
            if assigned.is_none() && reported.insert(year) && year > dates[0].year() {
                warn!(year, "no December observation in prior year; yearly ranking skipped");
            }
            assigned
        })
        .collect()
}

/// Rank every ranking date the cadence needs.
///
/// Eligible securities are those with a market cap on the ranking date;
/// they are passed in security-axis order so ties resolve by identifier.
///
/// # Returns
/// Snapshots keyed by ranking date.
///
/// # Errors
/// Returns `RankError` if a cross-section holds a non-finite market cap.
pub fn rank(
    panel: &Panel,
    cadence: Cadence,
    kind: RankKind,
) -> Result<BTreeMap<Date, RankingSnapshot>, RankError> {
    let schedule = RankingSchedule::new(panel.dates(), cadence);
    let ranker = ranker_for(kind);
    let snapshots = schedule
        .ranking_indices()
        .iter()
        .map(|&j| {
            let xs = panel.cross_section(j);
            ranker.snapshot(xs.date(), &xs.eligible_market_caps()).map(|s| (xs.date(), s))
        })
        .collect::<Result<BTreeMap<_, _>, _>>()?;
    debug!(%cadence, ?kind, snapshots = snapshots.len(), "ranked panel");
    Ok(snapshots)
}
